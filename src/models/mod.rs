//! Scheduling domain models.
//!
//! Provides the data types shared by every policy run: the task itself,
//! released instances of periodic tasks, and the resulting timeline.
//!
//! # Domain Mappings
//!
//! | cpu-sched-sim | Operating Systems | Real-Time Systems |
//! |---------------|-------------------|-------------------|
//! | Task | Process | Periodic Task |
//! | TaskInstance | (none) | Job |
//! | Execution / Slice | CPU burst | Execution segment |
//! | Timeline | Gantt chart | Schedule trace |

mod instance;
mod task;
mod timeline;

pub use instance::TaskInstance;
pub use task::{Execution, Task, Time};
pub use timeline::{Slice, Timeline};
