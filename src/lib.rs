//! Brasa Kernel Library.
//!
//! Ponto central de exportação dos módulos do substrato do kernel.
//! Contém o núcleo de memória e concorrência: alocador de frames
//! físicos, mutex bloqueante integrado ao scheduler, a camada de
//! metadados do MinixFS e o loader de páginas ELF32.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (necessário para Vec/Box/Arc)
extern crate alloc;

// --- Módulos Centrais (Lógica do Kernel) ---
pub mod core; // Logging
pub mod klib; // Utilitários Internos (Bitmap)
pub mod mm; // Gerenciamento de Memória Física (PMM)
pub mod sync; // Primitivas de Sincronização (Spinlock, Mutex)

// --- Subsistemas Avançados ---
pub mod fs; // MinixFS (superblock, storage manager, inodes)
pub mod sched; // Contrato do Scheduler + Loader ELF32

pub use crate::mm::config::PAGE_SIZE;
pub use crate::sched::{Scheduler, ThreadId};
