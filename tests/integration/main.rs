#![allow(clippy::unwrap_used, clippy::expect_used)]

mod helpers;

mod completion_flow;
mod history_navigation;
mod turn_lifecycle;
