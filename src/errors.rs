// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures at the record write boundary that callers may want to match on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("Record '{id}' not found")]
    NotFound { id: String },
}
