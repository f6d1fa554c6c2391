// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod dates;
pub mod db;
pub mod errors;
pub mod models;
pub mod repo;
pub mod settings;
pub mod summary;
pub mod totals;
pub mod utils;
pub mod validation;
