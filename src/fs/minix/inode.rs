//! Inode em memória.

use crate::fs::minix::dentry::DentryId;
use crate::fs::minix::layout::{Mode, RawInode, ZONES_PER_INODE};

/// Variante do objeto de FS. Fechada: o Minix V1 aqui só materializa
/// arquivo e diretório; link fica reservado no formato.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeType {
    File,
    Dir,
    Link,
}

impl InodeType {
    /// Bits de modo gravados no disco para este tipo (tipo | rwx geral).
    pub fn mode_bits(&self) -> u16 {
        match self {
            InodeType::File => Mode::FILE.bits() | Mode::PERMS.bits(),
            InodeType::Dir => Mode::DIR.bits() | Mode::PERMS.bits(),
            InodeType::Link => Mode::PERMS.bits(),
        }
    }

    pub fn from_mode(mode: u16) -> Self {
        if mode & Mode::DIR.bits() != 0 {
            InodeType::Dir
        } else if mode & Mode::FILE.bits() != 0 {
            InodeType::File
        } else {
            InodeType::Link
        }
    }
}

/// Instância em memória de um inode. No máximo uma por inode on-disk
/// (cache do superbloco garante).
#[derive(Debug, Clone)]
pub struct Inode {
    /// Identidade on-disk, imutável depois da criação.
    pub i_num: u16,
    pub i_type: InodeType,
    pub i_size: u32,
    pub i_nlink: u8,
    /// 7 zonas diretas + indireta + dupla-indireta (números absolutos;
    /// 0 = ausente).
    pub i_zones: [u16; ZONES_PER_INODE],
    /// Posição na árvore de dentries, se houver.
    pub dentry: Option<DentryId>,
    /// Descritores abertos sobre este inode.
    pub open_count: u32,
    /// Modificado desde o último write_inode.
    pub dirty: bool,
}

impl Inode {
    pub fn from_raw(i_num: u16, raw: &RawInode) -> Self {
        Self {
            i_num,
            i_type: InodeType::from_mode(raw.mode),
            i_size: raw.size,
            i_nlink: raw.nlink,
            i_zones: raw.zones,
            dentry: None,
            open_count: 0,
            dirty: false,
        }
    }

    /// Inode recém-criado: zonas zeradas, sem links ainda.
    pub fn fresh(i_num: u16, i_type: InodeType) -> Self {
        Self {
            i_num,
            i_type,
            i_size: 0,
            i_nlink: 0,
            i_zones: [0; ZONES_PER_INODE],
            dentry: None,
            open_count: 0,
            dirty: false,
        }
    }

    pub fn to_raw(&self) -> RawInode {
        RawInode {
            mode: self.i_type.mode_bits(),
            size: self.i_size,
            nlink: self.i_nlink,
            zones: self.i_zones,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tipo_do_modo() {
        assert_eq!(InodeType::from_mode(0x81FF), InodeType::File);
        assert_eq!(InodeType::from_mode(0x41FF), InodeType::Dir);
        assert_eq!(InodeType::from_mode(0x01FF), InodeType::Link);
    }

    #[test]
    fn test_raw_roundtrip() {
        let mut inode = Inode::fresh(3, InodeType::File);
        inode.i_size = 123;
        inode.i_nlink = 1;
        inode.i_zones[0] = 8;
        let back = Inode::from_raw(3, &inode.to_raw());
        assert_eq!(back.i_type, InodeType::File);
        assert_eq!(back.i_size, 123);
        assert_eq!(back.i_nlink, 1);
        assert_eq!(back.i_zones[0], 8);
        assert!(!back.dirty);
        assert_eq!(back.open_count, 0);
    }
}
