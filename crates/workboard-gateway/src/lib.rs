//! # Workboard Gateway
//!
//! JSON-over-HTTP API the browser frontend syncs its localStorage with.
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /` | status + stats + endpoint directory |
//! | `POST /api/sync` | replace-or-skip both collections |
//! | `GET/POST /api/tasks` | read / replace tasks |
//! | `GET/POST /api/discoveries` | read / replace discoveries |
//! | `GET /api/load` | both collections, string-encoded and parsed |
//! | `GET /api/stats` | counters |
//! | `POST /api/backup`, `POST /backup` | snapshot both collections |

pub mod routes;
pub mod server;
pub mod sync;

pub use server::{AppState, build_router, start};
pub use sync::{CollectionPayload, SyncCounts, SyncPayload, SyncPlan};
