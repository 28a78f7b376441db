//! Internal logging shim.
//!
//! With the `tracing` feature the macros forward to the `tracing` crate;
//! without it they expand to nothing.

#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace_event {
    ($($argument:tt)*) => {
        ::tracing::trace!($($argument)*)
    };
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace_event {
    ($($argument:tt)*) => {};
}

#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! error_event {
    ($($argument:tt)*) => {
        ::tracing::error!($($argument)*)
    };
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! error_event {
    ($($argument:tt)*) => {};
}
