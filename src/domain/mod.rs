//! Domain Layer
//!
//! Pure supervision logic without process or file system dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Child handle, supervisor state, child messages
//! - `value_objects/` - Ignore rules, dependency depth limits
//! - `services/` - Dependency filtering, missing-module resolution
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never spawns processes or touches the file system
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
