//! Menu planning over product, dish and menu catalogues.
//!
//! [`domain`] holds the validated value types, the filter and sort algebra,
//! candidate resolution and shortfall pricing; [`outbound`] holds adapters
//! implementing the domain's repository ports.

pub mod domain;
pub mod outbound;

#[cfg(test)]
mod test_support;
