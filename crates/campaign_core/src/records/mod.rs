//! Records shared by several sections.

pub mod base;
pub mod event_node;
pub mod mission_request;
pub mod waypoint;

pub use base::CampaignBase;
pub use event_node::EventNode;
pub use mission_request::MissionRequest;
pub use waypoint::{HAVE_DEPARTURE_TIME, HAVE_TARGET, Waypoint, WaypointTarget};
