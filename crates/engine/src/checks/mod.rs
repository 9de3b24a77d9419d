//! Check implementations for [`Verifier`]
//!
//! One module per capability family. Every method is `#[track_caller]` so
//! the failure records the location of the user's call, not of this crate.

mod compare;
mod container;
mod number;
mod object;
mod string;

use crate::capability::Subject;
use crate::sink::FailureSink;
use crate::verifier::Verifier;

impl<T, K: FailureSink> Subject for Verifier<T, K> {
    type Value = T;
    type Sink = K;
}
