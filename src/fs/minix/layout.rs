//! Layout on-disk do Minix (V1, nomes de 14 bytes).
//!
//! Tudo little-endian, compatível bit a bit com o formato clássico:
//! bloco 0 reservado (boot), bloco 1 superbloco, blocos 2.. bitmaps de
//! inode e zona, depois a tabela de inodes, depois as zonas de dados.

use crate::fs::device::BLOCK_SIZE;
use crate::fs::error::{FsError, FsResult};
use bitflags::bitflags;

/// Magic do Minix V1 com nomes de 14 bytes.
pub const MINIX_MAGIC: u16 = 0x137F;

/// Bloco do superbloco.
pub const SUPERBLOCK_BLOCK: u64 = 1;
/// Primeiro bloco dos bitmaps (inode bitmap primeiro, zona depois).
pub const BITMAPS_START_BLOCK: u64 = 2;

/// Registro de inode empacotado: mode(2) uid(2) size(4) time(4) gid(1)
/// nlink(1) 9×zona(2).
pub const INODE_SIZE: usize = 32;
pub const INODES_PER_BLOCK: usize = BLOCK_SIZE / INODE_SIZE;

/// Ponteiros de zona por inode: 7 diretos, 1 indireto, 1 duplo-indireto.
pub const ZONES_PER_INODE: usize = 9;
pub const DIRECT_ZONES: usize = 7;
/// Entradas u16 num bloco indireto.
pub const ZONES_PER_INDIRECT: usize = BLOCK_SIZE / 2;

/// Entrada de diretório: inode(2) + nome(14).
pub const DIRENT_SIZE: usize = 16;
pub const MAX_NAME_LEN: usize = 14;

/// Inode da raiz. Sempre setado no bitmap de um FS válido.
pub const ROOT_INODE: u16 = 1;

bitflags! {
    /// Bits de modo do registro de inode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Mode: u16 {
        const PERMS = 0x01FF;
        const DIR   = 0x4000;
        const FILE  = 0x8000;
    }
}

fn get_u16(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([buf[off], buf[off + 1]])
}

fn get_u32(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

fn put_u16(buf: &mut [u8], off: usize, v: u16) {
    buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut [u8], off: usize, v: u32) {
    buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
}

/// Campos do superbloco como lidos do bloco 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSuperblock {
    pub num_inodes: u16,
    pub num_zones: u16,
    pub inode_bm_blocks: u16,
    pub zone_bm_blocks: u16,
    pub first_data_zone: u16,
    pub log_zone_size: u16,
    pub max_file_size: u32,
    pub magic: u16,
}

impl RawSuperblock {
    /// Decodifica o bloco 1 e valida magic e contadores.
    pub fn parse(block: &[u8]) -> FsResult<Self> {
        let raw = Self {
            num_inodes: get_u16(block, 0),
            num_zones: get_u16(block, 2),
            inode_bm_blocks: get_u16(block, 4),
            zone_bm_blocks: get_u16(block, 6),
            first_data_zone: get_u16(block, 8),
            log_zone_size: get_u16(block, 10),
            max_file_size: get_u32(block, 12),
            magic: get_u16(block, 16),
        };
        if raw.magic != MINIX_MAGIC {
            crate::kwarn!("(MinixFS) magic invalido: {:#06x}", raw.magic);
            return Err(FsError::InvalidSuperblock);
        }
        if raw.num_zones == 0 || raw.inode_bm_blocks == 0 || raw.zone_bm_blocks == 0 {
            crate::kwarn!("(MinixFS) superbloco com contadores zerados");
            return Err(FsError::InvalidSuperblock);
        }
        Ok(raw)
    }

    /// Serializa no começo de `block` (o restante fica intacto).
    pub fn encode(&self, block: &mut [u8]) {
        put_u16(block, 0, self.num_inodes);
        put_u16(block, 2, self.num_zones);
        put_u16(block, 4, self.inode_bm_blocks);
        put_u16(block, 6, self.zone_bm_blocks);
        put_u16(block, 8, self.first_data_zone);
        put_u16(block, 10, self.log_zone_size);
        put_u32(block, 12, self.max_file_size);
        put_u16(block, 16, self.magic);
    }

    /// Primeiro bloco da tabela de inodes.
    pub fn inode_table_block(&self) -> u64 {
        BITMAPS_START_BLOCK + self.inode_bm_blocks as u64 + self.zone_bm_blocks as u64
    }

    /// (bloco, offset em bytes) do registro do inode `i_num`.
    pub fn inode_location(&self, i_num: u16) -> (u64, usize) {
        let index = (i_num - 1) as usize;
        let block = self.inode_table_block() + (index * INODE_SIZE / BLOCK_SIZE) as u64;
        (block, (index * INODE_SIZE) % BLOCK_SIZE)
    }
}

/// Campos do registro de inode como estão no disco.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInode {
    pub mode: u16,
    pub size: u32,
    pub nlink: u8,
    pub zones: [u16; ZONES_PER_INODE],
}

impl RawInode {
    /// Decodifica um registro de INODE_SIZE bytes. uid/gid/time são
    /// ignorados na leitura (sempre zerados na escrita).
    pub fn parse(rec: &[u8]) -> Self {
        let mut zones = [0u16; ZONES_PER_INODE];
        for (n, z) in zones.iter_mut().enumerate() {
            *z = get_u16(rec, 14 + n * 2);
        }
        Self {
            mode: get_u16(rec, 0),
            size: get_u32(rec, 4),
            nlink: rec[13],
            zones,
        }
    }

    /// Sobrepõe os campos deste inode num registro já lido do disco,
    /// zerando uid/gid/time incondicionalmente.
    pub fn overlay(&self, rec: &mut [u8]) {
        put_u16(rec, 0, get_u16(rec, 0) | self.mode);
        put_u16(rec, 2, 0);
        put_u32(rec, 4, self.size);
        put_u32(rec, 8, 0);
        rec[12] = 0;
        rec[13] = self.nlink;
        for (n, z) in self.zones.iter().enumerate() {
            put_u16(rec, 14 + n * 2, *z);
        }
    }
}

/// Entrada de diretório crua.
pub struct RawDirent;

impl RawDirent {
    pub fn parse(rec: &[u8]) -> (u16, &[u8]) {
        let i_num = get_u16(rec, 0);
        let name = &rec[2..DIRENT_SIZE];
        let len = name.iter().position(|&b| b == 0).unwrap_or(MAX_NAME_LEN);
        (i_num, &name[..len])
    }

    pub fn encode(rec: &mut [u8], i_num: u16, name: &[u8]) {
        debug_assert!(name.len() <= MAX_NAME_LEN);
        put_u16(rec, 0, i_num);
        rec[2..DIRENT_SIZE].fill(0);
        rec[2..2 + name.len()].copy_from_slice(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superblock_roundtrip() {
        let raw = RawSuperblock {
            num_inodes: 64,
            num_zones: 100,
            inode_bm_blocks: 1,
            zone_bm_blocks: 1,
            first_data_zone: 6,
            log_zone_size: 0,
            max_file_size: 0x1000_0000,
            magic: MINIX_MAGIC,
        };
        let mut block = [0u8; BLOCK_SIZE];
        raw.encode(&mut block);
        assert_eq!(RawSuperblock::parse(&block).unwrap(), raw);
        // Offsets bit-exatos
        assert_eq!(u16::from_le_bytes([block[16], block[17]]), MINIX_MAGIC);
        assert_eq!(u16::from_le_bytes([block[8], block[9]]), 6);
    }

    #[test]
    fn test_superblock_magic_invalido() {
        let mut block = [0u8; BLOCK_SIZE];
        RawSuperblock {
            magic: 0x1234,
            ..RawSuperblock {
                num_inodes: 1,
                num_zones: 1,
                inode_bm_blocks: 1,
                zone_bm_blocks: 1,
                first_data_zone: 5,
                log_zone_size: 0,
                max_file_size: 0,
                magic: 0,
            }
        }
        .encode(&mut block);
        assert_eq!(RawSuperblock::parse(&block), Err(FsError::InvalidSuperblock));
    }

    #[test]
    fn test_inode_location() {
        let raw = RawSuperblock {
            num_inodes: 64,
            num_zones: 100,
            inode_bm_blocks: 1,
            zone_bm_blocks: 1,
            first_data_zone: 6,
            log_zone_size: 0,
            max_file_size: 0,
            magic: MINIX_MAGIC,
        };
        // Tabela começa em 2 + 1 + 1 = 4; inode 1 é o primeiro registro.
        assert_eq!(raw.inode_location(1), (4, 0));
        assert_eq!(raw.inode_location(32), (4, 31 * INODE_SIZE));
        assert_eq!(raw.inode_location(33), (5, 0));
    }

    #[test]
    fn test_raw_inode_overlay_preserva_vizinhos() {
        let mut rec = [0xFFu8; INODE_SIZE];
        let raw = RawInode {
            mode: Mode::FILE.bits() | Mode::PERMS.bits(),
            size: 300,
            nlink: 1,
            zones: [9, 0, 0, 0, 0, 0, 0, 0, 0],
        };
        raw.overlay(&mut rec);
        let back = RawInode::parse(&rec);
        assert_eq!(back.size, 300);
        assert_eq!(back.nlink, 1);
        assert_eq!(back.zones[0], 9);
        // uid/time/gid zerados incondicionalmente
        assert_eq!(&rec[2..4], &[0, 0]);
        assert_eq!(&rec[8..12], &[0, 0, 0, 0]);
        assert_eq!(rec[12], 0);
    }

    #[test]
    fn test_dirent() {
        let mut rec = [0u8; DIRENT_SIZE];
        RawDirent::encode(&mut rec, 7, b"hello.txt");
        let (i_num, name) = RawDirent::parse(&rec);
        assert_eq!(i_num, 7);
        assert_eq!(name, b"hello.txt");
    }
}
