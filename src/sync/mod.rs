//! # Synchronization Primitives
//!
//! Primitivas de sincronização do substrato.
//!
//! ## Hierarquia de Uso
//!
//! ```text
//! Spinlock → Seções críticas curtas (não pode dormir)
//! Mutex    → Seções que podem bloquear (dorme via scheduler)
//! ```
//!
//! ## Regras
//!
//! - **Spinlock**: usar apenas quando NÃO pode dormir (metadados de locks)
//! - **Mutex**: preferir para seções normais do kernel
//! - **Ordem de Lock**: sempre adquirir na mesma ordem para evitar deadlock
//! - Uma thread segurando o lock do PageManager nunca pode bloquear
//!   (contrato, não imposto pelo sistema de tipos)

pub mod mutex;
pub mod spinlock;

pub use mutex::{Mutex, MutexGuard};
pub use spinlock::{Spinlock, SpinlockGuard};
