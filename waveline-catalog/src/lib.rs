pub mod assignment;
pub mod crew;
pub mod fleet;
pub mod route;
pub mod schedule;

pub use assignment::{ensure_no_assignment_conflict, AssignedWindow, AssignmentError, FerryAssignment};
pub use crew::Staff;
pub use fleet::{Ferry, FleetError};
pub use route::{Port, Route, RouteError};
pub use schedule::{Schedule, ScheduleError};
