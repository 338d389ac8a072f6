use rand::Rng;

use super::layout::{DYNAMIC_LAYOUT, STATIC_LAYOUT};
use super::record::ObjectRecord;

/// CPU mirror of the per-object GPU parameters.
///
/// Holds the records plus two independently sized packed regions:
/// - static bytes (`STATIC_LAYOUT.stride() × len`), written once at construction
/// - dynamic bytes (`DYNAMIC_LAYOUT.stride() × len`), rewritten by [`update`](Self::update)
///
/// A dynamic write never touches the static region and the static region is
/// never rewritten.
#[derive(Debug, Clone)]
pub struct ParamStore {
    records: Vec<ObjectRecord>,
    static_bytes: Vec<u8>,
    dynamic_bytes: Vec<u8>,

    static_upload_pending: bool,
    static_writes: usize,
    dynamic_writes: usize,
}

impl ParamStore {
    /// Creates `count` records with random static fields.
    pub fn initialize<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let records = (0..count).map(|_| ObjectRecord::random(rng)).collect();
        Self::from_records(records)
    }

    /// Packs caller-provided records. The static region is written here, once.
    pub fn from_records(records: Vec<ObjectRecord>) -> Self {
        let count = records.len();
        let static_stride = STATIC_LAYOUT.stride() as usize;
        let dynamic_stride = DYNAMIC_LAYOUT.stride() as usize;

        let mut store = Self {
            records,
            static_bytes: vec![0; static_stride * count],
            dynamic_bytes: vec![0; dynamic_stride * count],
            static_upload_pending: true,
            static_writes: 0,
            dynamic_writes: 0,
        };

        for (rec, chunk) in store
            .records
            .iter()
            .zip(store.static_bytes.chunks_exact_mut(static_stride))
        {
            STATIC_LAYOUT.write(chunk, "color", &rec.color);
            STATIC_LAYOUT.write(chunk, "offset", &rec.offset);
            store.static_writes += 1;
        }

        assert_eq!(store.static_bytes.len(), static_stride * count);
        assert_eq!(store.dynamic_bytes.len(), dynamic_stride * count);

        log::debug!(
            "param store: {count} records, {} static + {} dynamic bytes",
            store.static_bytes.len(),
            store.dynamic_bytes.len()
        );

        store
    }

    /// Recomputes every record's dynamic fields for this frame.
    ///
    /// A pure function of the stored records and the arguments: calling it
    /// twice with the same inputs produces the same bytes.
    pub fn update(&mut self, time: f32, aspect: f32) {
        let stride = DYNAMIC_LAYOUT.stride() as usize;
        for (rec, chunk) in self
            .records
            .iter()
            .zip(self.dynamic_bytes.chunks_exact_mut(stride))
        {
            DYNAMIC_LAYOUT.write(chunk, "scale", &rec.scale_for(aspect));
            DYNAMIC_LAYOUT.write(chunk, "time", &[time]);
            self.dynamic_writes += 1;
        }
    }

    /// Returns the static region the first time it is asked for, `None` after.
    pub fn take_static_upload(&mut self) -> Option<&[u8]> {
        if std::mem::take(&mut self.static_upload_pending) {
            Some(&self.static_bytes)
        } else {
            None
        }
    }

    /// Whether the static region still awaits its one upload.
    #[inline]
    pub fn static_upload_pending(&self) -> bool {
        self.static_upload_pending
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[ObjectRecord] {
        &self.records
    }

    #[inline]
    pub fn static_bytes(&self) -> &[u8] {
        &self.static_bytes
    }

    #[inline]
    pub fn dynamic_bytes(&self) -> &[u8] {
        &self.dynamic_bytes
    }

    /// Packed static bytes of record `index` (one full stride).
    pub fn static_record(&self, index: usize) -> &[u8] {
        let stride = STATIC_LAYOUT.stride() as usize;
        &self.static_bytes[index * stride..(index + 1) * stride]
    }

    /// Packed dynamic bytes of record `index` (one full stride).
    pub fn dynamic_record(&self, index: usize) -> &[u8] {
        let stride = DYNAMIC_LAYOUT.stride() as usize;
        &self.dynamic_bytes[index * stride..(index + 1) * stride]
    }

    /// Number of record writes into the static region so far.
    #[inline]
    pub fn static_writes(&self) -> usize {
        self.static_writes
    }

    /// Number of record writes into the dynamic region so far.
    #[inline]
    pub fn dynamic_writes(&self) -> usize {
        self.dynamic_writes
    }
}
