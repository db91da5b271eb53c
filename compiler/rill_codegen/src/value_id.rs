//! Opaque ID newtypes for backend IR handles.
//!
//! The lowering pipeline never holds backend values directly — every
//! value, block, function, and mutable slot is addressed through a `Copy`
//! u32 handle minted by the backend. This keeps backend lifetimes (such
//! as inkwell's `'ctx`) out of the core entirely.
//!
//! A `NONE` sentinel (`u32::MAX`) marks uninitialized/absent handles.

/// Opaque handle to a backend value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueId(u32);

/// Opaque handle to a backend basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

/// Opaque handle to a backend function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

/// Opaque handle to a mutable storage slot (an entry-block alloca under
/// LLVM). The backend-level face of one scope cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId(u32);

impl ValueId {
    /// Sentinel for "no value".
    pub const NONE: Self = Self(u32::MAX);

    /// Create from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// True if this is the `NONE` sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// The raw index.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl BlockId {
    /// Sentinel for "no block".
    pub const NONE: Self = Self(u32::MAX);

    /// Create from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// True if this is the `NONE` sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// The raw index.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl FunctionId {
    /// Sentinel for "no function".
    pub const NONE: Self = Self(u32::MAX);

    /// Create from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// True if this is the `NONE` sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// The raw index.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl SlotId {
    /// Sentinel for "no slot".
    pub const NONE: Self = Self(u32::MAX);

    /// Create from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// True if this is the `NONE` sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// The raw index.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}
