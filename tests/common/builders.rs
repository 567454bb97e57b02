//! Synthetic wire-format builders for the integration tests.
//!
//! Each builder emits a byte-exact file image so the readers can be
//! exercised without fixture files on disk.

#![allow(dead_code)]

/// Builds a shapefile image: big-endian header words, little-endian body.
pub struct ShpBuilder {
    shape_type: i32,
    records: Vec<u8>,
}

impl ShpBuilder {
    pub fn new(shape_type: i32) -> Self {
        Self {
            shape_type,
            records: Vec::new(),
        }
    }

    /// Append one record: big-endian record header, raw little-endian body.
    pub fn record(mut self, number: i32, body: &[u8]) -> Self {
        assert_eq!(body.len() % 2, 0, "record bodies are word-aligned");
        self.records.extend_from_slice(&number.to_be_bytes());
        self.records
            .extend_from_slice(&((body.len() / 2) as i32).to_be_bytes());
        self.records.extend_from_slice(body);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.build_with_version(1000)
    }

    pub fn build_with_version(self, version: i32) -> Vec<u8> {
        let total_len = 100 + self.records.len();
        let mut buf = Vec::with_capacity(total_len);
        buf.extend_from_slice(&9994i32.to_be_bytes());
        buf.extend_from_slice(&[0u8; 20]);
        buf.extend_from_slice(&((total_len / 2) as i32).to_be_bytes());
        buf.extend_from_slice(&version.to_le_bytes());
        buf.extend_from_slice(&self.shape_type.to_le_bytes());
        for _ in 0..8 {
            buf.extend_from_slice(&0f64.to_le_bytes());
        }
        assert_eq!(buf.len(), 100);
        buf.extend_from_slice(&self.records);
        buf
    }
}

/// Little-endian point-record body (shape type 1).
pub fn shp_point_body(x: f64, y: f64) -> Vec<u8> {
    let mut body = Vec::with_capacity(20);
    body.extend_from_slice(&1i32.to_le_bytes());
    body.extend_from_slice(&x.to_le_bytes());
    body.extend_from_slice(&y.to_le_bytes());
    body
}

/// Little-endian polyline body (shape type 3).
pub fn shp_polyline_body(parts: &[i32], points: &[(f64, f64)]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&3i32.to_le_bytes());
    for _ in 0..4 {
        body.extend_from_slice(&0f64.to_le_bytes());
    }
    body.extend_from_slice(&(parts.len() as i32).to_le_bytes());
    body.extend_from_slice(&(points.len() as i32).to_le_bytes());
    for part in parts {
        body.extend_from_slice(&part.to_le_bytes());
    }
    for (x, y) in points {
        body.extend_from_slice(&x.to_le_bytes());
        body.extend_from_slice(&y.to_le_bytes());
    }
    body
}

/// One field declaration for the DBF table builders.
pub struct DbfFieldSpec {
    pub name: &'static str,
    pub field_type: u8,
    pub length: u8,
}

/// Builds a dBase III (version byte 0x03) table image.
///
/// Layout: 32-byte preamble, 25-byte descriptors, 0x0D terminator, then
/// fixed-width records each led by a deletion marker byte.
pub fn dbf3_table(fields: &[DbfFieldSpec], records: &[(bool, Vec<u8>)]) -> Vec<u8> {
    let header_bytes = (32 + fields.len() * 25 + 1) as i16;
    let record_bytes = (1 + fields.iter().map(|f| f.length as usize).sum::<usize>()) as i16;

    let mut buf = Vec::new();
    buf.push(0x03);
    buf.push(95); // 1995
    buf.push(6);
    buf.push(15);
    buf.extend_from_slice(&(records.len() as i32).to_le_bytes());
    buf.extend_from_slice(&header_bytes.to_le_bytes());
    buf.extend_from_slice(&record_bytes.to_le_bytes());
    buf.extend_from_slice(&[0u8; 20]);
    assert_eq!(buf.len(), 32);

    for field in fields {
        let mut name = [0u8; 11];
        name[..field.name.len()].copy_from_slice(field.name.as_bytes());
        buf.extend_from_slice(&name);
        buf.push(field.field_type);
        buf.extend_from_slice(&[0u8; 4]); // memory address
        buf.push(field.length);
        buf.push(0); // decimals
        buf.extend_from_slice(&[0u8; 7]);
    }
    buf.push(0x0D);
    assert_eq!(buf.len(), header_bytes as usize);

    for (deleted, payload) in records {
        buf.push(if *deleted { 0x1A } else { b' ' });
        buf.extend_from_slice(payload);
        assert_eq!(1 + payload.len(), record_bytes as usize);
    }
    buf
}

/// Builds a dBase II (version byte 0x02) table image.
///
/// Layout: 8-byte big-endian preamble, 16-byte descriptors, 0x0D terminator,
/// then the records. The 16-bit count serves as both record count and field
/// count, so a self-consistent image needs as many records as fields.
pub fn dbf2_table(fields: &[DbfFieldSpec], records: &[(bool, Vec<u8>)]) -> Vec<u8> {
    assert_eq!(fields.len(), records.len(), "the count byte covers both");
    let record_bytes = (1 + fields.iter().map(|f| f.length as usize).sum::<usize>()) as i16;

    let mut buf = Vec::new();
    buf.push(0x02);
    buf.extend_from_slice(&(records.len() as i16).to_be_bytes());
    buf.push(87); // 1987
    buf.push(3);
    buf.push(9);
    buf.extend_from_slice(&record_bytes.to_be_bytes());
    assert_eq!(buf.len(), 8);

    for field in fields {
        let mut name = [0u8; 11];
        name[..field.name.len()].copy_from_slice(field.name.as_bytes());
        buf.extend_from_slice(&name);
        buf.push(field.field_type);
        buf.push(field.length);
        buf.extend_from_slice(&0i16.to_be_bytes()); // memory address
        buf.push(0); // decimals
    }
    buf.push(0x0D);

    for (deleted, payload) in records {
        buf.push(if *deleted { 0x1A } else { b' ' });
        buf.extend_from_slice(payload);
        assert_eq!(1 + payload.len(), record_bytes as usize);
    }
    buf
}

/// Builds a dBase IV (version byte 0x8B) table image.
///
/// Layout: 32-byte preamble with transaction / encryption / language-driver
/// bytes, 25-byte descriptors up to the declared header size, 0x0D
/// terminator, then the records.
pub fn dbf4_table(fields: &[DbfFieldSpec], records: &[(bool, Vec<u8>)]) -> Vec<u8> {
    let header_bytes = (30 + fields.len() * 25 + 1) as i16;
    let record_bytes = (1 + fields.iter().map(|f| f.length as usize).sum::<usize>()) as i16;

    let mut buf = Vec::new();
    buf.push(0x8B);
    buf.push(101); // 2001
    buf.push(11);
    buf.push(23);
    buf.extend_from_slice(&(records.len() as i32).to_le_bytes());
    buf.extend_from_slice(&header_bytes.to_le_bytes());
    buf.extend_from_slice(&record_bytes.to_le_bytes());
    buf.push(0); // incomplete transaction
    buf.push(0); // encryption
    buf.extend_from_slice(&[0u8; 12]);
    buf.push(1); // mdx flag
    buf.push(0x57); // language driver
    buf.extend_from_slice(&[0u8; 2]);
    assert_eq!(buf.len(), 30);

    for field in fields {
        let mut name = [0u8; 11];
        name[..field.name.len()].copy_from_slice(field.name.as_bytes());
        buf.extend_from_slice(&name);
        buf.push(field.field_type);
        buf.extend_from_slice(&[0u8; 4]); // memory address
        buf.push(field.length);
        buf.push(0); // decimals
        buf.extend_from_slice(&[0u8; 7]);
    }
    buf.push(0x0D);
    assert_eq!(buf.len(), header_bytes as usize);

    for (deleted, payload) in records {
        buf.push(if *deleted { 0x1A } else { b' ' });
        buf.extend_from_slice(payload);
        assert_eq!(1 + payload.len(), record_bytes as usize);
    }
    buf
}

/// Builds a dBase 7 (version byte 0x04) table image.
///
/// Layout: the dBase IV preamble plus a 32-byte language-driver name, then
/// 48-byte wide-name descriptors with autoincrement slots, 0x0D terminator,
/// then the records.
pub fn dbf7_table(fields: &[DbfFieldSpec], records: &[(bool, Vec<u8>)]) -> Vec<u8> {
    let header_bytes = (62 + fields.len() * 48 + 1) as i16;
    let record_bytes = (1 + fields.iter().map(|f| f.length as usize).sum::<usize>()) as i16;

    let mut buf = Vec::new();
    buf.push(0x04);
    buf.push(105); // 2005
    buf.push(1);
    buf.push(31);
    buf.extend_from_slice(&(records.len() as i32).to_le_bytes());
    buf.extend_from_slice(&header_bytes.to_le_bytes());
    buf.extend_from_slice(&record_bytes.to_le_bytes());
    buf.push(0); // incomplete transaction
    buf.push(0); // encryption
    buf.extend_from_slice(&[0u8; 12]);
    buf.push(0); // mdx flag
    buf.push(0x57); // language driver
    buf.extend_from_slice(&[0u8; 2]);
    let mut driver_name = [0u8; 32];
    driver_name[..6].copy_from_slice(b"DB7LDR");
    buf.extend_from_slice(&driver_name);
    assert_eq!(buf.len(), 62);

    for field in fields {
        let mut name = [0u8; 32];
        name[..field.name.len()].copy_from_slice(field.name.as_bytes());
        buf.extend_from_slice(&name);
        buf.push(field.field_type);
        buf.push(field.length);
        buf.push(0); // decimals
        buf.extend_from_slice(&[0u8; 2]);
        buf.push(0); // mdx flag
        buf.extend_from_slice(&[0u8; 2]);
        buf.extend_from_slice(&7i32.to_be_bytes()); // next autoincrement
        buf.extend_from_slice(&[0u8; 4]);
    }
    buf.push(0x0D);
    assert_eq!(buf.len(), header_bytes as usize);

    for (deleted, payload) in records {
        buf.push(if *deleted { 0x1A } else { b' ' });
        buf.extend_from_slice(payload);
        assert_eq!(1 + payload.len(), record_bytes as usize);
    }
    buf
}

/// Builds a LAS 1.2 image with format-0 point records.
pub struct LasBuilder {
    scale: [f64; 3],
    offset: [f64; 3],
    vlrs: Vec<u8>,
    vlr_count: u32,
    points: Vec<u8>,
    point_count: u32,
    padding_before_points: usize,
}

impl LasBuilder {
    pub fn new() -> Self {
        Self {
            scale: [1.0, 1.0, 1.0],
            offset: [0.0, 0.0, 0.0],
            vlrs: Vec::new(),
            vlr_count: 0,
            points: Vec::new(),
            point_count: 0,
            padding_before_points: 0,
        }
    }

    pub fn scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.scale = [x, y, z];
        self
    }

    pub fn offset(mut self, x: f64, y: f64, z: f64) -> Self {
        self.offset = [x, y, z];
        self
    }

    pub fn vlr(mut self, user_id: &str, record_id: u16, content: &[u8]) -> Self {
        self.vlrs.extend_from_slice(&0u16.to_le_bytes());
        let mut id = [0u8; 16];
        id[..user_id.len()].copy_from_slice(user_id.as_bytes());
        self.vlrs.extend_from_slice(&id);
        self.vlrs.extend_from_slice(&record_id.to_le_bytes());
        self.vlrs
            .extend_from_slice(&(content.len() as u16).to_le_bytes());
        self.vlrs.extend_from_slice(&[0u8; 32]);
        self.vlrs.extend_from_slice(content);
        self.vlr_count += 1;
        self
    }

    /// Dead bytes between the VLR block and the point data, to provoke the
    /// offset-mismatch warning.
    pub fn padding_before_points(mut self, n: usize) -> Self {
        self.padding_before_points = n;
        self
    }

    /// Append one format-0 point record.
    pub fn point(mut self, x: i32, y: i32, z: i32, classification: u8, intensity: u16) -> Self {
        self.points.extend_from_slice(&x.to_le_bytes());
        self.points.extend_from_slice(&y.to_le_bytes());
        self.points.extend_from_slice(&z.to_le_bytes());
        self.points.extend_from_slice(&intensity.to_le_bytes());
        self.points.push(0b0000_1001); // first of one return
        self.points.push(classification);
        self.points.push(0); // scan angle rank
        self.points.push(0); // user data
        self.points.extend_from_slice(&0u16.to_le_bytes());
        self.point_count += 1;
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.build_custom(20, None)
    }

    /// Build with an overridden record length or point count, for the
    /// consistency-check tests.
    pub fn build_custom(self, record_length: u16, point_count: Option<u32>) -> Vec<u8> {
        const HEADER_SIZE: u16 = 227;
        let point_data_offset =
            HEADER_SIZE as u32 + self.vlrs.len() as u32 + self.padding_before_points as u32;

        let mut buf = Vec::new();
        buf.extend_from_slice(b"LASF");
        buf.extend_from_slice(&0u16.to_le_bytes()); // file source id
        buf.extend_from_slice(&0u16.to_le_bytes()); // global encoding
        buf.extend_from_slice(&[0u8; 16]); // guid
        buf.push(1);
        buf.push(2);
        let mut sys_id = [0u8; 32];
        sys_id[..4].copy_from_slice(b"TEST");
        buf.extend_from_slice(&sys_id);
        buf.extend_from_slice(&[0u8; 32]); // generating software
        buf.extend_from_slice(&1u16.to_le_bytes()); // day of year
        buf.extend_from_slice(&2020u16.to_le_bytes());
        buf.extend_from_slice(&HEADER_SIZE.to_le_bytes());
        buf.extend_from_slice(&point_data_offset.to_le_bytes());
        buf.extend_from_slice(&self.vlr_count.to_le_bytes());
        buf.push(0); // point format
        buf.extend_from_slice(&record_length.to_le_bytes());
        buf.extend_from_slice(&point_count.unwrap_or(self.point_count).to_le_bytes());
        buf.extend_from_slice(&[0u8; 20]); // legacy points by return
        for v in self.scale.iter().chain(self.offset.iter()) {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        for _ in 0..6 {
            buf.extend_from_slice(&0f64.to_le_bytes());
        }
        assert_eq!(buf.len() as u16, HEADER_SIZE);

        buf.extend_from_slice(&self.vlrs);
        buf.extend_from_slice(&vec![0u8; self.padding_before_points]);
        buf.extend_from_slice(&self.points);
        buf
    }
}

impl Default for LasBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a bare LAS 1.4 image: 375-byte header, no VLRs, no point data.
/// The declared point count is taken at face value, so inconsistent values
/// exercise the reader's consistency checks.
pub fn las14_header_only(point_format: u8, record_length: u16, point_count: u64) -> Vec<u8> {
    const HEADER_SIZE: u16 = 375;

    let mut buf = Vec::new();
    buf.extend_from_slice(b"LASF");
    buf.extend_from_slice(&0u16.to_le_bytes()); // file source id
    buf.extend_from_slice(&0u16.to_le_bytes()); // global encoding
    buf.extend_from_slice(&[0u8; 16]); // guid
    buf.push(1);
    buf.push(4);
    buf.extend_from_slice(&[0u8; 32]); // system identifier
    buf.extend_from_slice(&[0u8; 32]); // generating software
    buf.extend_from_slice(&1u16.to_le_bytes()); // day of year
    buf.extend_from_slice(&2020u16.to_le_bytes());
    buf.extend_from_slice(&HEADER_SIZE.to_le_bytes());
    buf.extend_from_slice(&(HEADER_SIZE as u32).to_le_bytes()); // point data offset
    buf.extend_from_slice(&0u32.to_le_bytes()); // vlr count
    buf.push(point_format);
    buf.extend_from_slice(&record_length.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // legacy point count
    buf.extend_from_slice(&[0u8; 20]); // legacy points by return
    for _ in 0..6 {
        buf.extend_from_slice(&0f64.to_le_bytes()); // scale, offset
    }
    for _ in 0..6 {
        buf.extend_from_slice(&0f64.to_le_bytes()); // max/min pairs
    }
    buf.extend_from_slice(&0u64.to_le_bytes()); // waveform start
    buf.extend_from_slice(&0u64.to_le_bytes()); // first EVLR offset
    buf.extend_from_slice(&0u32.to_le_bytes()); // evlr count
    buf.extend_from_slice(&point_count.to_le_bytes());
    buf.extend_from_slice(&[0u8; 120]); // points by return
    assert_eq!(buf.len() as u16, HEADER_SIZE);
    buf
}
