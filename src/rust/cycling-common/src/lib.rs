// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

pub mod named_id;
