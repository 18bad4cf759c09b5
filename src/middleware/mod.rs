// ABOUTME: HTTP middleware shared by every route group
// ABOUTME: Cross-origin policy and request-id propagation for the coaching API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS configuration for the web client
pub mod cors;

/// Request id generation and propagation
pub mod request_id;

pub use cors::setup_cors;
pub use request_id::{propagate_request_id_layer, set_request_id_layer, REQUEST_ID_HEADER};
