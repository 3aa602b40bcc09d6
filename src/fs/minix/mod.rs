//! Motor de metadados Minix (V1).
//!
//! Submódulos:
//! - `layout`: formato on-disk bit-exato (superbloco, inode, dirent).
//! - `storage`: bitmaps de inode e zona.
//! - `inode` / `dentry`: objetos em memória.
//! - `superblock`: orquestração de mount, cache e ciclo de vida.

pub mod dentry;
pub mod inode;
pub mod layout;
pub mod storage;
pub mod superblock;


use crate::fs::device::BlockDevice;
use crate::fs::error::FsResult;
use alloc::boxed::Box;
use spin::Mutex;
use superblock::MinixSuperblock;

pub use dentry::DentryId;
pub use inode::{Inode, InodeType};

/// Um mount Minix com serialização própria.
///
/// O superbloco e seu cache de inodes assumem um chamador por vez; o
/// Mutex aqui fecha essa premissa para chamadores concorrentes (um lock
/// grosso por mount, não por inode).
pub struct MinixFs {
    sb: Mutex<Option<MinixSuperblock>>,
}

impl MinixFs {
    pub fn mount(dev: Box<dyn BlockDevice>) -> FsResult<Self> {
        Ok(Self {
            sb: Mutex::new(Some(MinixSuperblock::mount(dev)?)),
        })
    }

    /// Executa `f` com o superbloco sob o lock do mount.
    pub fn with<R>(&self, f: impl FnOnce(&mut MinixSuperblock) -> R) -> R {
        let mut guard = self.sb.lock();
        let sb = guard.as_mut().expect("mount ja desfeito");
        f(sb)
    }

    /// Desmonta e devolve o device. Chamadas posteriores são erro de
    /// lógica.
    pub fn unmount(&self) -> FsResult<Box<dyn BlockDevice>> {
        let sb = self.sb.lock().take().expect("mount ja desfeito");
        sb.unmount()
    }
}
