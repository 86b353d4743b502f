//! JSON-RPC 2.0 bridge between the emblem and its host page.
//!
//! The emblem runs inside an iframe; the host page talks to it with
//! postMessage. Requests carry an id and get a response, notifications do
//! not.
//!
//! ```text
//! Host page (parent)  <──postMessage──>  Emblem (iframe)
//!        │                                    │
//!        ├─ navigate_to_section {id} ───────> ├─ NavigateToSection event
//!        │ <──────────── { accepted } ────────┤
//!        │                                    │
//!        │ <──── navigation_hover ────────────┤ hover enter / leave
//!        │ <──── navigation_click ────────────┤ dive finished
//! ```
//!
//! ## Methods
//! - `navigate_to_section { section_id }` → `{ accepted }`
//! - `reset_click_transition` → `{ was_active }`
//! - `get_emblem_state` → phase, dive flag, mount flags, live animations
//! - `get_sections` → the four section slots and whether each is bound
//! - `unmount` → `{ unmounted, cancelled }`
//!
//! ## Notifications
//! - `emblem_ready`, `decompose`, `decompose_complete`
//! - `navigation_hover` (all-null params on leave), `navigation_click`
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000`: Emblem already unmounted

/// Emblem methods, request dispatch and notification payloads.
pub mod bridge;

/// postMessage transport, message queue and the RPC plugin.
pub mod web_rpc;
