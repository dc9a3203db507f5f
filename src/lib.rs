// Kasasagi image variant library
//
// Storage events in, resized and watermarked JPEG variants out.

pub mod clients;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod image_optimizer;
pub mod logging;
pub mod notify;
pub mod pipeline;
pub mod storage;
pub mod watermark;
