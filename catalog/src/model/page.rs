// CourseDesk
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Pagination of listings.

use coursedesk_core::model::{ModelError, ModelResult};
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;

/// A validated request for one page of a listing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageRequest {
    /// 1-based number of the page to return.
    number: u32,

    /// Maximum number of items per page.
    size: u32,
}

impl PageRequest {
    /// Creates a new page request, checking that `number` is at least 1 and that `size` is in the
    /// `[1, max_size]` range.
    pub fn new(number: u32, size: u32, max_size: u32) -> ModelResult<Self> {
        if number < 1 {
            return Err(ModelError("Page number must be at least 1".to_owned()));
        }
        if size < 1 || size > max_size {
            return Err(ModelError(format!("Page size must be between 1 and {}", max_size)));
        }
        Ok(Self { number, size })
    }

    /// Returns the 1-based page number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns the maximum number of items in the page.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns how many items precede this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }
}

/// One page of a listing along with the information needed to fetch the others.
#[derive(Debug, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in this page.
    pub items: Vec<T>,

    /// Number of items across all pages.
    pub total_items: u64,

    /// 1-based number of this page.
    pub current_page: u32,

    /// Number of pages needed to hold all items.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Creates a page for `request` that holds `items` out of `total_items`.
    pub fn new(request: PageRequest, items: Vec<T>, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(request.size));
        Self { items, total_items, current_page: request.number, total_pages }
    }
}
