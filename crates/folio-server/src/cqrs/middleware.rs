//! Request markers
//!
//! Every mediator request is either a [`Command`] (writes) or a [`Query`]
//! (reads). The markers let generic code tell the two apart.

/// A request that changes state
pub trait Command {
    const KIND: &'static str = "command";
}

/// A read-only request
pub trait Query {
    const KIND: &'static str = "query";
}
