//! Run CloudWatch Logs Insights queries and wait for their results.
//!
//! # Example
//!
//! ```no_run
//! use qdawslogs::{CloudWatchInsights, Poller, QueryBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = QueryBuilder::new("/aws/ecs/prod-rt")
//!         .message_filter("19062412_5Xi2eYcEc6")
//!         .limit(1000)
//!         .build()?;
//!
//!     let service = CloudWatchInsights::connect("us-east-1").await;
//!     let results = Poller::new(service).run(&request).await?;
//!
//!     for row in &results.rows {
//!         println!("{}", qdawslogs::render_text(row));
//!     }
//!     Ok(())
//! }
//! ```

mod builder;
mod cloudwatch;
mod poller;
mod render;
mod time_arg;

pub use builder::{BuildError, QueryBuilder, ALLOWED_FIELDS, DEFAULT_FIELDS, DEFAULT_RANGE_SECS};
pub use cloudwatch::CloudWatchInsights;
pub use poller::{PollError, Poller, DEFAULT_POLL_INTERVAL};
pub use qdawslogs_protocol::*;
pub use render::{render_json, render_text, OutputFormat};
pub use time_arg::{parse_time_arg, TimeArgError};
