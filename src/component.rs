// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Components are data attached to entities.
//!
//! A component's identity is its [`ComponentType`] tag, not its Rust
//! type: two values stored under the same tag belong to the same column.
//! [`ComponentStore`](crate::storage::ComponentStore) binds a tag to a
//! concrete record layout the first time a value is added under it and
//! downcasts safely on every access after that.

use std::any::Any;
use std::sync::Arc;

/// Stable textual tag identifying a component's schema and column.
pub type ComponentType = Arc<str>;

/// Marker trait for components.
///
/// Components must be `'static` (no borrowed data) and safe to move
/// between threads, even though the core itself never does so — this
/// keeps the door open for callers that wrap a `World` in their own
/// synchronization.
pub trait Component: Any + Send + Sync {}

/// Automatically implement `Component` for all valid types.
impl<T: Any + Send + Sync> Component for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct Position {
        #[allow(dead_code)]
        x: f32,
    }

    #[test]
    fn component_type_compares_by_value() {
        let a: ComponentType = Arc::from("position");
        let b: ComponentType = Arc::from("position");
        assert_eq!(a, b);
    }

    #[test]
    fn any_static_type_is_a_component() {
        fn assert_component<T: Component>() {}
        assert_component::<Position>();
        assert_component::<i32>();
    }
}
