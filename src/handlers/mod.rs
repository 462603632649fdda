// Handlers by security tier:
// public (no auth) and protected (bearer token, caller injected by middleware)
pub mod protected;
pub mod public;
