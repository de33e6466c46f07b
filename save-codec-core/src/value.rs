//! The property/struct value model.
//!
//! This is a tagged-variant `Property`/`StructPayload` design (per the
//! design notes): every wire-level property or struct type-tag maps to one
//! enum variant, decode/encode pairs for the well-known struct names live in
//! `save-codec-binary::property::structs`, and anything this crate doesn't
//! model by name falls back to [`StructPayload::Generic`], a nested
//! property list.
//!
//! A property list is a `Vec<Property>` rather than a map: the wire format
//! allows (and in a few legacy saves, contains) more than one property with
//! the same name, and decode order must be preserved for byte-identical
//! re-encoding.

use std::fmt;

/// A pair of strings identifying a scene object: its owning level and its
/// path within that level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectReference {
    pub level_name: String,
    pub path_name: String,
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.level_name, self.path_name)
    }
}

/// The optional 16-byte GUID carried by most property values, gated by a
/// leading flag byte on the wire. `None` means the flag byte was zero.
pub type GuidInfo = Option<[u8; 16]>;

/// An ordered sequence of properties, terminated on the wire by a single
/// property named `None` with no payload (the terminator itself is not
/// stored here; codec code appends/strips it at the I/O boundary).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyList(pub Vec<Property>);

impl PropertyList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, property: Property) {
        self.0.push(property);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First property with this name, if any.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.0.iter().find(|p| p.name == name)
    }
}

impl IntoIterator for PropertyList {
    type Item = Property;
    type IntoIter = std::vec::IntoIter<Property>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A single named, typed, self-describing property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    /// Nonzero only for elements of a static (fixed-length) array.
    pub array_index: u32,
    pub guid: GuidInfo,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            array_index: 0,
            guid: None,
            value,
        }
    }
}

/// The payload carried by a property, discriminated by its wire type-tag.
///
/// `PartialEq` is implemented by hand: `Float`/`Double` compare by raw bit
/// pattern rather than IEEE-754 equality, so that `0.0` and `-0.0` (and
/// distinct NaN payloads) compare unequal, matching the bit-exact
/// round-trip invariant this codec enforces.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Bool(bool),
    Int8(i8),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Str(String),
    Name(String),
    Object(ObjectReference),
    SoftObject { reference: ObjectReference, extra: i32 },
    Enum { enum_type: String, value: String },
    Text(TextValue),
    Byte(ByteValue),
    Array(ArrayProperty),
    Set(SetProperty),
    Map(MapProperty),
    Struct {
        struct_type: String,
        struct_guid: [u8; 16],
        payload: StructPayload,
    },
}

/// `ByteProperty`'s body: either a raw byte (enum-name `"None"` on the
/// wire) or a named enum value.
#[derive(Debug, Clone, PartialEq)]
pub enum ByteValue {
    Raw(u8),
    Enum { enum_name: String, value: String },
}

/// `ArrayProperty`'s body. `StructProperty`-typed arrays carry one shared
/// struct header up front (name/struct-type/declared-size/GUID) instead of
/// repeating it per element.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayProperty {
    pub inner_tag: String,
    pub guid: GuidInfo,
    pub elements: ArrayElements,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayElements {
    Simple(Vec<PropertyValue>),
    Struct {
        element_name: String,
        struct_type: String,
        struct_guid: [u8; 16],
        guid: GuidInfo,
        elements: Vec<StructPayload>,
    },
}

/// `SetProperty`'s body. `removal_count` is the wire's "zero 32-bit prefix"
/// field after the element count — always 0 in a full save, but preserved
/// verbatim since it is not assumed.
#[derive(Debug, Clone, PartialEq)]
pub struct SetProperty {
    pub inner_tag: String,
    pub guid: GuidInfo,
    pub removal_count: i32,
    pub elements: Vec<PropertyValue>,
}

/// `MapProperty`'s body. `removal_count` is the wire's leading "zero 32-bit
/// prefix" field before the entry count.
#[derive(Debug, Clone, PartialEq)]
pub struct MapProperty {
    pub key_tag: String,
    pub value_tag: String,
    pub guid: GuidInfo,
    pub removal_count: i32,
    pub entries: Vec<(PropertyValue, PropertyValue)>,
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        use PropertyValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Int8(a), Int8(b)) => a == b,
            (Int32(a), Int32(b)) => a == b,
            (Int64(a), Int64(b)) => a == b,
            (UInt8(a), UInt8(b)) => a == b,
            (UInt32(a), UInt32(b)) => a == b,
            (UInt64(a), UInt64(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (Str(a), Str(b)) => a == b,
            (Name(a), Name(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            (
                SoftObject { reference: ra, extra: ea },
                SoftObject { reference: rb, extra: eb },
            ) => ra == rb && ea == eb,
            (
                Enum { enum_type: ta, value: va },
                Enum { enum_type: tb, value: vb },
            ) => ta == tb && va == vb,
            (Text(a), Text(b)) => a == b,
            (Byte(a), Byte(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Set(a), Set(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (
                Struct { struct_type: ta, struct_guid: ga, payload: pa },
                Struct { struct_type: tb, struct_guid: gb, payload: pb },
            ) => ta == tb && ga == gb && pa == pb,
            _ => false,
        }
    }
}

fn arr3_bits_eq(a: &[f64; 3], b: &[f64; 3]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

fn arr4_bits_eq(a: &[f64; 4], b: &[f64; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

fn opt_arr3_bits_eq(a: &Option<[f64; 3]>, b: &Option<[f64; 3]>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => arr3_bits_eq(x, y),
        (None, None) => true,
        _ => false,
    }
}

fn opt_arr4_bits_eq(a: &Option<[f64; 4]>, b: &Option<[f64; 4]>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => arr4_bits_eq(x, y),
        (None, None) => true,
        _ => false,
    }
}

/// Payload of a dispatched struct. Well-known struct names get a specific
/// variant; anything else decodes as [`StructPayload::Generic`].
///
/// `PartialEq` compares every float field by bit pattern, for the same
/// reason as [`PropertyValue`].
#[derive(Debug, Clone)]
pub enum StructPayload {
    Vector { x: f64, y: f64, z: f64 },
    Vector2D { x: f64, y: f64 },
    Vector4 { x: f64, y: f64, z: f64, w: f64 },
    Quat { x: f64, y: f64, z: f64, w: f64 },
    Rotator { pitch: f64, yaw: f64, roll: f64 },
    Color { b: u8, g: u8, r: u8, a: u8 },
    LinearColor { r: f32, g: f32, b: f32, a: f32 },
    Transform {
        rotation: Option<[f64; 4]>,
        translation: Option<[f64; 3]>,
        scale3d: Option<[f64; 3]>,
    },
    Box {
        min: [f64; 3],
        max: [f64; 3],
        is_valid: u8,
    },
    IntPoint { x: i32, y: i32 },
    IntVector { x: i32, y: i32, z: i32 },
    DateTime { ticks: i64 },
    Guid([u8; 16]),
    FluidBox { value: f32 },
    FicFrameRange { begin_frame: i64, end_frame: i64 },
    /// A point on a railroad track: the track object it belongs to, plus
    /// its offset and forward direction along that track's spline.
    RailroadTrackPosition {
        track: ObjectReference,
        offset: f32,
        forward: f32,
    },
    /// One inventory slot: an item class name, and the item's own nested
    /// state object if the item variant carries one (e.g. a color gun's
    /// selected color).
    InventoryItem {
        item_name: String,
        state: Option<ObjectReference>,
    },
    /// A platform-specific player/session identity blob, carried opaquely
    /// since its internal layout varies by platform.
    ClientIdentityInfo(Vec<u8>),
    /// A resource descriptor paired with a scanned amount, as reported by
    /// a resource scanner.
    ScannableResourcePair {
        resource: ObjectReference,
        amount: i32,
    },
    /// A dynamically-typed spawn payload: a class path plus the nested
    /// property list the spawned instance was configured with.
    SpawnData {
        class_path: String,
        properties: PropertyList,
    },
    /// The cost of unlocking one milestone/phase: a sequence of
    /// (item class name, amount) pairs.
    PhaseCost { item_costs: Vec<(String, i32)> },
    /// Fallback for any struct-type name this codec doesn't special-case:
    /// a nested, `None`-terminated property list.
    Generic(PropertyList),
}

impl PartialEq for StructPayload {
    fn eq(&self, other: &Self) -> bool {
        use StructPayload::*;
        match (self, other) {
            (Vector { x: xa, y: ya, z: za }, Vector { x: xb, y: yb, z: zb }) => {
                xa.to_bits() == xb.to_bits() && ya.to_bits() == yb.to_bits() && za.to_bits() == zb.to_bits()
            }
            (Vector2D { x: xa, y: ya }, Vector2D { x: xb, y: yb }) => {
                xa.to_bits() == xb.to_bits() && ya.to_bits() == yb.to_bits()
            }
            (
                Vector4 { x: xa, y: ya, z: za, w: wa },
                Vector4 { x: xb, y: yb, z: zb, w: wb },
            ) => {
                xa.to_bits() == xb.to_bits()
                    && ya.to_bits() == yb.to_bits()
                    && za.to_bits() == zb.to_bits()
                    && wa.to_bits() == wb.to_bits()
            }
            (Quat { x: xa, y: ya, z: za, w: wa }, Quat { x: xb, y: yb, z: zb, w: wb }) => {
                xa.to_bits() == xb.to_bits()
                    && ya.to_bits() == yb.to_bits()
                    && za.to_bits() == zb.to_bits()
                    && wa.to_bits() == wb.to_bits()
            }
            (
                Rotator { pitch: pa, yaw: ya, roll: ra },
                Rotator { pitch: pb, yaw: yb, roll: rb },
            ) => pa.to_bits() == pb.to_bits() && ya.to_bits() == yb.to_bits() && ra.to_bits() == rb.to_bits(),
            (Color { b: ba, g: ga, r: ra, a: aa }, Color { b: bb, g: gb, r: rb, a: ab }) => {
                ba == bb && ga == gb && ra == rb && aa == ab
            }
            (
                LinearColor { r: ra, g: ga, b: ba, a: aa },
                LinearColor { r: rb, g: gb, b: bb, a: ab },
            ) => {
                ra.to_bits() == rb.to_bits()
                    && ga.to_bits() == gb.to_bits()
                    && ba.to_bits() == bb.to_bits()
                    && aa.to_bits() == ab.to_bits()
            }
            (
                Transform { rotation: ra, translation: ta, scale3d: sa },
                Transform { rotation: rb, translation: tb, scale3d: sb },
            ) => opt_arr4_bits_eq(ra, rb) && opt_arr3_bits_eq(ta, tb) && opt_arr3_bits_eq(sa, sb),
            (
                Box { min: mina, max: maxa, is_valid: iva },
                Box { min: minb, max: maxb, is_valid: ivb },
            ) => arr3_bits_eq(mina, minb) && arr3_bits_eq(maxa, maxb) && iva == ivb,
            (IntPoint { x: xa, y: ya }, IntPoint { x: xb, y: yb }) => xa == xb && ya == yb,
            (
                IntVector { x: xa, y: ya, z: za },
                IntVector { x: xb, y: yb, z: zb },
            ) => xa == xb && ya == yb && za == zb,
            (DateTime { ticks: a }, DateTime { ticks: b }) => a == b,
            (Guid(a), Guid(b)) => a == b,
            (FluidBox { value: a }, FluidBox { value: b }) => a.to_bits() == b.to_bits(),
            (
                FicFrameRange { begin_frame: ba, end_frame: ea },
                FicFrameRange { begin_frame: bb, end_frame: eb },
            ) => ba == bb && ea == eb,
            (
                RailroadTrackPosition { track: ta, offset: oa, forward: fa },
                RailroadTrackPosition { track: tb, offset: ob, forward: fb },
            ) => ta == tb && oa.to_bits() == ob.to_bits() && fa.to_bits() == fb.to_bits(),
            (
                InventoryItem { item_name: na, state: sa },
                InventoryItem { item_name: nb, state: sb },
            ) => na == nb && sa == sb,
            (ClientIdentityInfo(a), ClientIdentityInfo(b)) => a == b,
            (
                ScannableResourcePair { resource: ra, amount: aa },
                ScannableResourcePair { resource: rb, amount: ab },
            ) => ra == rb && aa == ab,
            (
                SpawnData { class_path: ca, properties: pa },
                SpawnData { class_path: cb, properties: pb },
            ) => ca == cb && pa == pb,
            (PhaseCost { item_costs: a }, PhaseCost { item_costs: b }) => a == b,
            (Generic(a), Generic(b)) => a == b,
            _ => false,
        }
    }
}

/// A recursive `FText`-style tagged text value.
#[derive(Debug, Clone, PartialEq)]
pub struct TextValue {
    pub flags: u32,
    pub history: TextHistory,
}

/// The history-type discriminator of a [`TextValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum TextHistory {
    None,
    Base {
        namespace: String,
        key: String,
        source_string: String,
    },
    NamedFormat {
        source_format: Box<TextValue>,
        arguments: Vec<(String, TextValue)>,
    },
    ArgumentFormat {
        source_format: Box<TextValue>,
        arguments: Vec<(String, TextValue)>,
    },
    AsNumber {
        source_value: Box<TextValue>,
        format_options: Option<String>,
        target_culture: String,
    },
    AsDate {
        date_time_ticks: i64,
        date_style: i32,
        target_culture: String,
    },
    Transform {
        source_text: Box<TextValue>,
        transform_type: i32,
    },
    StringTableEntry {
        table_id: String,
        key: String,
    },
}
