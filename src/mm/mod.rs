//! # Memory Management Subsystem (MM)
//!
//! O módulo `mm` gerencia a memória física do kernel.
//!
//! | Módulo   | Responsabilidade                                  |
//! |----------|---------------------------------------------------|
//! | `config` | Constantes (PAGE_SIZE, máscaras).                 |
//! | `pmm`    | Gerencia frames físicos (4 KiB) via Bitmap.       |
//!
//! O PageManager é um objeto de contexto explícito criado uma vez no boot
//! (ANTES das threads do scheduler começarem) e vivo até o shutdown — não
//! um singleton global.

pub mod config;
pub mod pmm;

pub use config::PAGE_SIZE;
pub use pmm::PageManager;
