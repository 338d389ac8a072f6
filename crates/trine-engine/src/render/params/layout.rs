//! Packed byte layouts mirroring WGSL struct declarations.
//!
//! Offsets follow the WGSL alignment rules for the scalar/vector types the
//! demos use. Every record is padded to a multiple of 16 bytes so the same
//! layout serves storage arrays and uniform bindings.

/// Record strides are rounded up to this many bytes.
pub const RECORD_ALIGN: u64 = 16;

/// WGSL field types used by the parameter structs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldType {
    F32,
    Vec2F,
    Vec4F,
}

impl FieldType {
    #[inline]
    pub const fn size(self) -> u64 {
        match self {
            Self::F32 => 4,
            Self::Vec2F => 8,
            Self::Vec4F => 16,
        }
    }

    #[inline]
    pub const fn align(self) -> u64 {
        match self {
            Self::F32 => 4,
            Self::Vec2F => 8,
            Self::Vec4F => 16,
        }
    }

    /// Number of `f32` components.
    #[inline]
    pub const fn components(self) -> usize {
        (self.size() / 4) as usize
    }
}

/// One declared struct member. Padding members are declared like any other.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

impl Field {
    #[inline]
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// A member placed at its byte offset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FieldSlot {
    pub field: Field,
    pub offset: u64,
}

impl FieldSlot {
    const EMPTY: Self = Self {
        field: Field::new("", FieldType::F32),
        offset: 0,
    };

    /// Byte range `[offset, offset + size)` within the record.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.field.ty.size() as usize
    }
}

/// Fixed-stride layout of one record, computed once from its declaration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StructLayout<const N: usize> {
    slots: [FieldSlot; N],
    /// End of the last member.
    size: u64,
    /// `size` rounded up to [`RECORD_ALIGN`].
    stride: u64,
}

const fn round_up(value: u64, align: u64) -> u64 {
    value.div_ceil(align) * align
}

impl<const N: usize> StructLayout<N> {
    /// Places `fields` in declaration order.
    pub const fn new(fields: [Field; N]) -> Self {
        let mut slots = [FieldSlot::EMPTY; N];
        let mut cursor = 0u64;
        let mut i = 0;
        while i < N {
            let ty = fields[i].ty;
            let offset = round_up(cursor, ty.align());
            slots[i] = FieldSlot {
                field: fields[i],
                offset,
            };
            cursor = offset + ty.size();
            i += 1;
        }

        Self {
            slots,
            size: cursor,
            stride: round_up(cursor, RECORD_ALIGN),
        }
    }

    #[inline]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub const fn stride(&self) -> u64 {
        self.stride
    }

    #[inline]
    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&FieldSlot> {
        self.slots.iter().find(|s| s.field.name == name)
    }

    /// Byte offset of `name`.
    ///
    /// # Panics
    /// If `name` is not declared; layouts are static, so this is a programming error.
    pub fn offset_of(&self, name: &str) -> u64 {
        match self.slot(name) {
            Some(s) => s.offset,
            None => panic!("field `{name}` is not part of this layout"),
        }
    }

    /// Byte span from the first to the last of the named (non-padding) members.
    ///
    /// Used to upload one group of fields without touching bytes outside it.
    pub fn span_of(&self, names: &[&str]) -> std::ops::Range<u64> {
        let mut start = u64::MAX;
        let mut end = 0;
        for name in names {
            let slot = self.slot(name);
            debug_assert!(slot.is_some(), "field `{name}` is not part of this layout");
            if let Some(s) = slot {
                start = start.min(s.offset);
                end = end.max(s.offset + s.field.ty.size());
            }
        }
        if start > end { 0..0 } else { start..end }
    }

    /// Writes `values` into the member `name` of the record starting at `record[0]`.
    ///
    /// `values` must have exactly as many components as the member.
    pub fn write(&self, record: &mut [u8], name: &str, values: &[f32]) {
        let slot = match self.slot(name) {
            Some(s) => s,
            None => panic!("field `{name}` is not part of this layout"),
        };
        assert_eq!(
            values.len(),
            slot.field.ty.components(),
            "component count mismatch for `{name}`"
        );
        record[slot.range()].copy_from_slice(bytemuck::cast_slice(values));
    }

    /// Reads the member `name` from the record starting at `record[0]`.
    pub fn read(&self, record: &[u8], name: &str) -> Vec<f32> {
        let slot = match self.slot(name) {
            Some(s) => s,
            None => panic!("field `{name}` is not part of this layout"),
        };
        record[slot.range()]
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect()
    }
}

// ── declared records ──────────────────────────────────────────────────────

/// Written once at startup: `color`, `offset`.
pub const STATIC_LAYOUT: StructLayout<3> = StructLayout::new([
    Field::new("color", FieldType::Vec4F),
    Field::new("offset", FieldType::Vec2F),
    Field::new("_pad", FieldType::Vec2F),
]);

/// Rewritten every frame: `scale`, `time`.
pub const DYNAMIC_LAYOUT: StructLayout<3> = StructLayout::new([
    Field::new("scale", FieldType::Vec2F),
    Field::new("time", FieldType::F32),
    Field::new("_pad", FieldType::F32),
]);

/// One uniform struct per object carrying both groups.
///
/// The static members come first so each group occupies one contiguous span.
pub const COMBINED_LAYOUT: StructLayout<7> = StructLayout::new([
    Field::new("color", FieldType::Vec4F),
    Field::new("offset", FieldType::Vec2F),
    Field::new("scale", FieldType::Vec2F),
    Field::new("time", FieldType::F32),
    Field::new("_pad0", FieldType::F32),
    Field::new("_pad1", FieldType::F32),
    Field::new("_pad2", FieldType::F32),
]);

/// Names of the members written once.
pub const STATIC_FIELDS: [&str; 2] = ["color", "offset"];

/// Names of the members written every frame.
pub const DYNAMIC_FIELDS: [&str; 2] = ["scale", "time"];
