//! Estruturas ELF32.
//!
//! Decodificação little-endian campo a campo (sem transmute de bytes),
//! com validação estrita: classe, endianness, máquina ou tipo errados
//! rejeitam o binário de cara, nunca melhor-esforço.

use crate::sched::exec::LoadError;
use bitflags::bitflags;

pub const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];
/// ELF de 32 bits.
pub const ELFCLASS32: u8 = 1;
/// Little-endian.
pub const ELFDATA2LSB: u8 = 1;
pub const EV_CURRENT: u8 = 1;
/// Executável (não-PIE).
pub const ET_EXEC: u16 = 2;
/// x86 de 32 bits.
pub const EM_386: u16 = 3;
/// Segmento carregável.
pub const PT_LOAD: u32 = 1;

pub const EHDR_SIZE: usize = 52;
pub const PHDR_SIZE: usize = 32;

bitflags! {
    /// Permissões de segmento (p_flags).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SegFlags: u32 {
        const X = 1;
        const W = 2;
        const R = 4;
    }
}

fn get_u16(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([buf[off], buf[off + 1]])
}

fn get_u32(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

/// Cabeçalho ELF32, só os campos que o carregador consome.
#[derive(Debug, Clone, Copy)]
pub struct ElfHeader {
    pub e_entry: u32,
    pub e_phoff: u32,
    pub e_phnum: u16,
}

impl ElfHeader {
    /// Decodifica e valida os EHDR_SIZE primeiros bytes da imagem.
    pub fn parse(buf: &[u8]) -> Result<Self, LoadError> {
        if buf.len() < EHDR_SIZE {
            return Err(LoadError::TruncatedImage);
        }
        if buf[0..4] != ELF_MAGIC {
            crate::kdebug!("(Loader) magic ELF invalido");
            return Err(LoadError::InvalidFormat);
        }
        if buf[4] != ELFCLASS32 || buf[5] != ELFDATA2LSB || buf[6] != EV_CURRENT {
            crate::kdebug!("(Loader) classe/endianness/versao nao suportada");
            return Err(LoadError::InvalidFormat);
        }
        let e_type = get_u16(buf, 16);
        let e_machine = get_u16(buf, 18);
        if e_type != ET_EXEC || e_machine != EM_386 {
            crate::kdebug!("(Loader) tipo {} / maquina {} rejeitados", e_type, e_machine);
            return Err(LoadError::InvalidFormat);
        }
        let e_phentsize = get_u16(buf, 42);
        if e_phentsize as usize != PHDR_SIZE {
            return Err(LoadError::InvalidFormat);
        }
        Ok(Self {
            e_entry: get_u32(buf, 24),
            e_phoff: get_u32(buf, 28),
            e_phnum: get_u16(buf, 44),
        })
    }
}

/// Program header ELF32.
#[derive(Debug, Clone, Copy)]
pub struct ProgramHeader {
    pub p_type: u32,
    pub p_offset: u32,
    pub p_vaddr: u32,
    pub p_filesz: u32,
    pub p_memsz: u32,
    pub p_flags: SegFlags,
}

impl ProgramHeader {
    /// Decodifica um registro de PHDR_SIZE bytes.
    pub fn parse(buf: &[u8]) -> Result<Self, LoadError> {
        if buf.len() < PHDR_SIZE {
            return Err(LoadError::TruncatedImage);
        }
        let ph = Self {
            p_type: get_u32(buf, 0),
            p_offset: get_u32(buf, 4),
            p_vaddr: get_u32(buf, 8),
            p_filesz: get_u32(buf, 16),
            p_memsz: get_u32(buf, 20),
            p_flags: SegFlags::from_bits_truncate(get_u32(buf, 24)),
        };
        if ph.p_filesz > ph.p_memsz {
            return Err(LoadError::InvalidFormat);
        }
        Ok(ph)
    }

    /// Offset no arquivo do byte mapeado em `vaddr`, se for file-backed.
    pub fn file_offset_of(&self, vaddr: u32) -> Option<u32> {
        if vaddr >= self.p_vaddr && vaddr < self.p_vaddr.wrapping_add(self.p_filesz) {
            Some(self.p_offset + (vaddr - self.p_vaddr))
        } else {
            None
        }
    }

    /// Byte presente só em memória (zero-fill além do trecho do
    /// arquivo, dentro do tamanho em memória).
    pub fn is_bss(&self, vaddr: u32) -> bool {
        vaddr >= self.p_vaddr.wrapping_add(self.p_filesz)
            && vaddr < self.p_vaddr.wrapping_add(self.p_memsz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_ehdr() -> [u8; EHDR_SIZE] {
        let mut b = [0u8; EHDR_SIZE];
        b[0..4].copy_from_slice(&ELF_MAGIC);
        b[4] = ELFCLASS32;
        b[5] = ELFDATA2LSB;
        b[6] = EV_CURRENT;
        b[16..18].copy_from_slice(&ET_EXEC.to_le_bytes());
        b[18..20].copy_from_slice(&EM_386.to_le_bytes());
        b[24..28].copy_from_slice(&0x1000u32.to_le_bytes());
        b[28..32].copy_from_slice(&(EHDR_SIZE as u32).to_le_bytes());
        b[42..44].copy_from_slice(&(PHDR_SIZE as u16).to_le_bytes());
        b[44..46].copy_from_slice(&1u16.to_le_bytes());
        b
    }

    #[test]
    fn test_ehdr_valido() {
        let h = ElfHeader::parse(&valid_ehdr()).unwrap();
        assert_eq!(h.e_entry, 0x1000);
        assert_eq!(h.e_phnum, 1);
    }

    #[test]
    fn test_rejeita_classe_64() {
        let mut b = valid_ehdr();
        b[4] = 2;
        assert!(matches!(ElfHeader::parse(&b), Err(LoadError::InvalidFormat)));
    }

    #[test]
    fn test_rejeita_big_endian() {
        let mut b = valid_ehdr();
        b[5] = 2;
        assert!(matches!(ElfHeader::parse(&b), Err(LoadError::InvalidFormat)));
    }

    #[test]
    fn test_rejeita_maquina_errada() {
        let mut b = valid_ehdr();
        b[18..20].copy_from_slice(&62u16.to_le_bytes());
        assert!(matches!(ElfHeader::parse(&b), Err(LoadError::InvalidFormat)));
    }

    #[test]
    fn test_classificacao_de_byte() {
        let ph = ProgramHeader {
            p_type: PT_LOAD,
            p_offset: 0x80,
            p_vaddr: 0x1000,
            p_filesz: 100,
            p_memsz: 0x1000,
            p_flags: SegFlags::R | SegFlags::X,
        };
        assert_eq!(ph.file_offset_of(0x1000), Some(0x80));
        assert_eq!(ph.file_offset_of(0x1063), Some(0x80 + 99));
        assert_eq!(ph.file_offset_of(0x1064), None);
        assert!(ph.is_bss(0x1064));
        assert!(ph.is_bss(0x1FFF));
        assert!(!ph.is_bss(0x2000));
    }
}
