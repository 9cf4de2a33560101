//! Format arguments.

use std::any::Any;
use std::fmt;

/// One value to substitute into a template.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    /// `{i8}`
    I8(i8),
    /// `{u8}`
    U8(u8),
    /// `{i16}`
    I16(i16),
    /// `{u16}`
    U16(u16),
    /// `{i32}`
    I32(i32),
    /// `{u32}`
    U32(u32),
    /// `{i64}`
    I64(i64),
    /// `{u64}`
    U64(u64),
    /// `{f32}`
    F32(f32),
    /// `{f64}`
    F64(f64),
    /// `{bool}`
    Bool(bool),
    /// `{str}`
    Str(&'a str),
    /// A value for a user-registered printer, recovered with
    /// [`Arg::downcast`].
    Custom(&'a dyn Any),
}

impl<'a> Arg<'a> {
    /// The custom payload as a `T`, if this is a [`Arg::Custom`] holding one.
    pub fn downcast<T: Any>(&self) -> Option<&'a T> {
        match *self {
            Arg::Custom(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Arg::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Arg::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Arg::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Arg::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Arg::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Arg::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Arg::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Arg::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Arg::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Arg::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Arg::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Arg::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Arg<'_> {
                fn from(v: $ty) -> Self {
                    Arg::$variant(v)
                }
            }
        )*
    };
}

impl_from!(
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
);

impl<'a> From<&'a str> for Arg<'a> {
    fn from(v: &'a str) -> Self {
        Arg::Str(v)
    }
}
