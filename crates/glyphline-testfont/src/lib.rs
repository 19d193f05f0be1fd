//! Tiny TrueType fonts built in memory for tests
//!
//! Just enough of the format for a real parser to accept: `cmap` (format 12),
//! `glyf`/`loca` (long offsets, simple glyphs), `head`, `hhea`, `hmtx` and
//! `maxp`. Coordinates are written as plain 16-bit deltas, so every glyph
//! point round-trips exactly.
//!
//! [`standard`] is the font most tests use:
//!
//! | char  | glyph | advance | shape                                   |
//! |-------|-------|---------|-----------------------------------------|
//! | -     | 0     | 500     | `.notdef`, empty                        |
//! | `A`   | 1     | 700     | box 100..600 x 0..700 with a hole       |
//! | `I`   | 2     | 300     | stem 100..200 x 0..700                  |
//! | space | 3     | 250     | empty                                   |
//! | `O`   | 4     | 800     | quadratic oval 100..700 x 0..700        |
//!
//! Units per em 1000, ascender 800, descender -200.

pub const UNITS_PER_EM: u16 = 1000;
pub const ASCENDER: i16 = 800;
pub const DESCENDER: i16 = -200;

pub const NOTDEF_ADVANCE: u16 = 500;
pub const A_ADVANCE: u16 = 700;
pub const I_ADVANCE: u16 = 300;
pub const SPACE_ADVANCE: u16 = 250;
pub const O_ADVANCE: u16 = 800;

/// One outline point in design units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pt {
    pub x: i16,
    pub y: i16,
    pub on_curve: bool,
}

/// On-curve point
pub const fn on(x: i16, y: i16) -> Pt {
    Pt { x, y, on_curve: true }
}

/// Off-curve (quadratic control) point
pub const fn off(x: i16, y: i16) -> Pt {
    Pt {
        x,
        y,
        on_curve: false,
    }
}

/// A glyph to be written into `glyf`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestGlyph {
    pub ch: Option<char>,
    pub advance: u16,
    pub contours: Vec<Vec<Pt>>,
}

impl TestGlyph {
    pub fn new(ch: Option<char>, advance: u16) -> Self {
        Self {
            ch,
            advance,
            contours: Vec::new(),
        }
    }

    pub fn contour(mut self, points: impl Into<Vec<Pt>>) -> Self {
        self.contours.push(points.into());
        self
    }

    /// Rectangle from `(x0, y0)` to `(x1, y1)`, wound clockwise (y up)
    pub fn rect(self, x0: i16, y0: i16, x1: i16, y1: i16) -> Self {
        self.contour(vec![on(x0, y0), on(x0, y1), on(x1, y1), on(x1, y0)])
    }

    /// Rectangle wound counter-clockwise, for holes
    pub fn hole(self, x0: i16, y0: i16, x1: i16, y1: i16) -> Self {
        self.contour(vec![on(x0, y0), on(x1, y0), on(x1, y1), on(x0, y1)])
    }

    fn bounds(&self) -> Option<(i16, i16, i16, i16)> {
        self.contours.iter().flatten().fold(None, |acc, p| {
            Some(match acc {
                None => (p.x, p.y, p.x, p.y),
                Some((x0, y0, x1, y1)) => (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
            })
        })
    }

    fn encode(&self) -> Vec<u8> {
        let Some((x_min, y_min, x_max, y_max)) = self.bounds() else {
            return Vec::new();
        };

        let mut out = Writer::default();
        out.i16(self.contours.len() as i16);
        out.i16(x_min);
        out.i16(y_min);
        out.i16(x_max);
        out.i16(y_max);

        let mut end = 0u16;
        for contour in &self.contours {
            end += contour.len() as u16;
            out.u16(end - 1);
        }
        out.u16(0); // no instructions

        let points: Vec<Pt> = self.contours.iter().flatten().copied().collect();
        for p in &points {
            out.u8(u8::from(p.on_curve));
        }
        let mut last = 0i16;
        for p in &points {
            out.i16(p.x - last);
            last = p.x;
        }
        let mut last = 0i16;
        for p in &points {
            out.i16(p.y - last);
            last = p.y;
        }
        out.align(4);
        out.0
    }
}

/// Assembles a font from glyphs and face metrics
#[derive(Debug, Clone)]
pub struct FontBuilder {
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    glyphs: Vec<TestGlyph>,
}

impl FontBuilder {
    /// A builder whose glyph 0 is an empty `.notdef`
    pub fn new(units_per_em: u16) -> Self {
        Self {
            units_per_em,
            ascender: ASCENDER,
            descender: DESCENDER,
            glyphs: vec![TestGlyph::new(None, NOTDEF_ADVANCE)],
        }
    }

    pub fn metrics(mut self, ascender: i16, descender: i16) -> Self {
        self.ascender = ascender;
        self.descender = descender;
        self
    }

    pub fn glyph(mut self, glyph: TestGlyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        write_sfnt(&self.tables(), 0)
    }

    fn tables(&self) -> Vec<([u8; 4], Vec<u8>)> {
        let mut glyf = Vec::new();
        let mut loca = Writer::default();
        for glyph in &self.glyphs {
            loca.u32(glyf.len() as u32);
            glyf.extend(glyph.encode());
        }
        loca.u32(glyf.len() as u32);

        vec![
            (*b"cmap", self.cmap()),
            (*b"glyf", glyf),
            (*b"head", self.head()),
            (*b"hhea", self.hhea()),
            (*b"hmtx", self.hmtx()),
            (*b"loca", loca.0),
            (*b"maxp", self.maxp()),
        ]
    }

    fn head(&self) -> Vec<u8> {
        let (x_min, y_min, x_max, y_max) = self
            .glyphs
            .iter()
            .filter_map(TestGlyph::bounds)
            .fold((0, 0, 0, 0), |(a, b, c, d), (x0, y0, x1, y1)| {
                (a.min(x0), b.min(y0), c.max(x1), d.max(y1))
            });

        let mut w = Writer::default();
        w.u32(0x0001_0000); // version
        w.u32(0x0001_0000); // fontRevision
        w.u32(0); // checksumAdjustment
        w.u32(0x5F0F_3CF5); // magicNumber
        w.u16(0x0003); // flags
        w.u16(self.units_per_em);
        w.u64(0); // created
        w.u64(0); // modified
        w.i16(x_min);
        w.i16(y_min);
        w.i16(x_max);
        w.i16(y_max);
        w.u16(0); // macStyle
        w.u16(8); // lowestRecPPEM
        w.i16(2); // fontDirectionHint
        w.i16(1); // indexToLocFormat: long
        w.i16(0); // glyphDataFormat
        w.0
    }

    fn hhea(&self) -> Vec<u8> {
        let advance_max = self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0);
        let mut w = Writer::default();
        w.u32(0x0001_0000);
        w.i16(self.ascender);
        w.i16(self.descender);
        w.i16(0); // lineGap
        w.u16(advance_max);
        w.i16(0); // minLeftSideBearing
        w.i16(0); // minRightSideBearing
        w.i16(0); // xMaxExtent
        w.i16(1); // caretSlopeRise
        w.i16(0); // caretSlopeRun
        w.i16(0); // caretOffset
        for _ in 0..4 {
            w.i16(0);
        }
        w.i16(0); // metricDataFormat
        w.u16(self.glyphs.len() as u16);
        w.0
    }

    fn hmtx(&self) -> Vec<u8> {
        let mut w = Writer::default();
        for glyph in &self.glyphs {
            w.u16(glyph.advance);
            w.i16(glyph.bounds().map_or(0, |b| b.0));
        }
        w.0
    }

    fn maxp(&self) -> Vec<u8> {
        let max_points = self
            .glyphs
            .iter()
            .map(|g| g.contours.iter().map(Vec::len).sum::<usize>())
            .max()
            .unwrap_or(0);
        let max_contours = self.glyphs.iter().map(|g| g.contours.len()).max().unwrap_or(0);

        let mut w = Writer::default();
        w.u32(0x0001_0000);
        w.u16(self.glyphs.len() as u16);
        w.u16(max_points as u16);
        w.u16(max_contours as u16);
        w.u16(0); // maxCompositePoints
        w.u16(0); // maxCompositeContours
        w.u16(2); // maxZones
        for _ in 0..8 {
            w.u16(0);
        }
        w.0
    }

    fn cmap(&self) -> Vec<u8> {
        let mut mapped: Vec<(u32, u32)> = self
            .glyphs
            .iter()
            .enumerate()
            .filter_map(|(gid, g)| g.ch.map(|ch| (ch as u32, gid as u32)))
            .collect();
        mapped.sort_unstable();

        let mut w = Writer::default();
        w.u16(0); // version
        w.u16(1); // numTables
        w.u16(3); // platform: Windows
        w.u16(10); // encoding: Unicode full repertoire
        w.u32(12); // subtable offset

        w.u16(12); // format
        w.u16(0);
        w.u32(16 + 12 * mapped.len() as u32);
        w.u32(0); // language
        w.u32(mapped.len() as u32);
        for (ch, gid) in mapped {
            w.u32(ch);
            w.u32(ch);
            w.u32(gid);
        }
        w.0
    }
}

/// The font described in the crate docs
pub fn standard() -> Vec<u8> {
    standard_builder().build()
}

pub fn standard_builder() -> FontBuilder {
    FontBuilder::new(UNITS_PER_EM)
        .glyph(
            TestGlyph::new(Some('A'), A_ADVANCE)
                .rect(100, 0, 600, 700)
                .hole(250, 300, 450, 550),
        )
        .glyph(TestGlyph::new(Some('I'), I_ADVANCE).rect(100, 0, 200, 700))
        .glyph(TestGlyph::new(Some(' '), SPACE_ADVANCE))
        .glyph(TestGlyph::new(Some('O'), O_ADVANCE).contour(vec![
            on(400, 0),
            off(700, 0),
            on(700, 350),
            off(700, 700),
            on(400, 700),
            off(100, 700),
            on(100, 350),
            off(100, 0),
        ]))
}

/// A TrueType collection holding each font in order
pub fn collection(fonts: &[FontBuilder]) -> Vec<u8> {
    let header_len = 12 + 4 * fonts.len();
    let mut faces = Vec::with_capacity(fonts.len());
    let mut offset = header_len;
    for font in fonts {
        let face = write_sfnt(&font.tables(), offset);
        offset += face.len();
        faces.push(face);
    }

    let mut w = Writer::default();
    w.bytes(b"ttcf");
    w.u32(0x0001_0000);
    w.u32(fonts.len() as u32);
    let mut offset = header_len;
    for face in &faces {
        w.u32(offset as u32);
        offset += face.len();
    }
    for face in faces {
        w.bytes(&face);
    }
    w.0
}

/// Table directory plus tables, with offsets counted from `base`
fn write_sfnt(tables: &[([u8; 4], Vec<u8>)], base: usize) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let entry_selector = 15 - num_tables.max(1).leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * 16;

    let mut w = Writer::default();
    w.u32(0x0001_0000);
    w.u16(num_tables);
    w.u16(search_range);
    w.u16(entry_selector);
    w.u16(num_tables * 16 - search_range);

    let mut offset = base + 12 + 16 * tables.len();
    for (tag, data) in tables {
        w.bytes(tag);
        w.u32(checksum(data));
        w.u32(offset as u32);
        w.u32(data.len() as u32);
        offset += padded(data.len());
    }
    for (_, data) in tables {
        w.bytes(data);
        w.align(4);
    }
    w.0
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Big-endian byte writer
#[derive(Default)]
struct Writer(Vec<u8>);

impl Writer {
    fn u8(&mut self, v: u8) {
        self.0.push(v);
    }

    fn u16(&mut self, v: u16) {
        self.0.extend(v.to_be_bytes());
    }

    fn i16(&mut self, v: i16) {
        self.0.extend(v.to_be_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.0.extend(v.to_be_bytes());
    }

    fn u64(&mut self, v: u64) {
        self.0.extend(v.to_be_bytes());
    }

    fn bytes(&mut self, v: &[u8]) {
        self.0.extend_from_slice(v);
    }

    fn align(&mut self, to: usize) {
        while self.0.len() % to != 0 {
            self.0.push(0);
        }
    }
}
