// All repository functions are generic over `E: Executor<'e, Database = Sqlite>`
// so they accept both a `&SqlitePool` (direct query) and a `&mut Transaction` (atomic operations).
// Functions issuing several statements take a `&mut SqliteConnection` instead.

pub mod dashboard;
pub mod question;
pub mod selection;
pub mod stats;
pub mod tags;
