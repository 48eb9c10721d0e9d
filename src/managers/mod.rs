// pagetrack state managers
// Managers own persistent state: the per-URL record store.

pub mod record_store;
