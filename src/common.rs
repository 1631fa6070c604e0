use std::num::NonZeroU32;
pub use vec1::vec1;

pub type Int = i64;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// The result of evaluating a node: never empty, usually a single value.
pub type Values = NonEmpty<Int>;

/// Sign carried by a `+`/`-` or `*`/`/` operator node.
pub(crate) const POSITIVE: Int = 1;
pub(crate) const NEGATIVE: Int = -1;

/// Placeholder produced by name references until named values exist.
pub(crate) const UNRESOLVED_NAME: Int = -1;
