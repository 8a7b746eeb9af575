/*!

Backend-hiding abstractions shared by the `kernel` crate.

A motivating example is the `IString` type, an interned string type used for
variable name hints and symbol names. A number of crates could provide this
functionality; this module redirects to whichever implementation is chosen so
that the rest of the engine never names the backing crate directly. To switch
from [`ustr`](https://crates.io/crates/ustr) to some other interner, only this
file needs to change.

*/

mod free_ids;
mod nat_set;
pub mod log;

pub use ustr::Ustr as IString;

pub use free_ids::FreeIdSet;
pub use nat_set::NatSet;

/// Creates an [`IString`] from anything that implements `AsRef<str>`.
#[inline(always)]
pub fn intern(s: impl AsRef<str>) -> IString {
    ustr::Ustr::from(s.as_ref())
}
