// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

use crate::cycles::Cycle;

/// Tags annotating an instruction, e.g. `"Rest for 1 hour [relax,night]"`
/// carries `relax` and `night`.
pub fn instruction_tags(instruction: &str) -> impl Iterator<Item = &str> {
    let tags = instruction
        .split_once(" [")
        .map(|(_, tags)| tags.strip_suffix(']').unwrap_or(tags))
        .unwrap_or_default();
    tags.split(',').map(str::trim).filter(|tag| !tag.is_empty())
}

/// Indices of the cycles with at least one instruction carrying `tag`.
pub(crate) fn search_tag(cycles: &[Cycle], tag: &str) -> Vec<usize> {
    cycles
        .iter()
        .enumerate()
        .filter(|(_, cycle)| {
            cycle
                .instructions()
                .iter()
                .filter_map(|instruction| instruction.as_text())
                .any(|text| instruction_tags(text).any(|t| t == tag))
        })
        .map(|(index, _)| index)
        .collect()
}
