// ABOUTME: Shared helpers for fitness model integration tests
// ABOUTME: Exports deterministic synthetic gym-member datasets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

pub mod synthetic_data;
