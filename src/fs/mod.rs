//! Subsistema de Arquivos.
//!
//! Submódulos:
//! - `device`: Trait de dispositivo de bloco e imagem em RAM.
//! - `error`: Erros recuperáveis do FS.
//! - `minix`: Motor de metadados Minix (superbloco, inodes, dentries).

pub mod device;
pub mod error;
pub mod minix;

pub use device::{BlockDevice, RamDisk, BLOCK_SIZE};
pub use error::{FsError, FsResult};
pub use minix::MinixFs;
