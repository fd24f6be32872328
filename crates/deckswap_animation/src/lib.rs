//! Deckswap Animation System
//!
//! Easing curves, spring physics, and timeline orchestration.
//!
//! # Features
//!
//! - **Easing**: Polynomial and elastic curves mapping progress to eased progress
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Timelines**: Labelled, offset-positioned tweens, instant sets, and cue markers
//! - **Scheduler**: One place that ticks every spring and timeline per frame
//! - **RAII Wrappers**: `AnimatedValue` and `AnimatedTimeline` unregister on drop

pub mod easing;
pub mod scheduler;
pub mod spring;
pub mod timeline;

pub use easing::Easing;
pub use scheduler::{
    AnimatedTimeline, AnimatedValue, AnimationScheduler, SchedulerHandle, SpringId, TimelineId,
};
pub use spring::{Spring, SpringConfig};
pub use timeline::{EventBatch, Position, Timeline, TimelineEvent};
