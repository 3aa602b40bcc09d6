//! Carregador preguiçoso: mapeia uma página por page fault.
//!
//! Uma página virtual pode cruzar vários segmentos do binário, então
//! cada byte dela é classificado individualmente (file-backed, bss ou
//! fora de todo segmento) e os trechos file-backed contíguos são
//! coalescidos para sair numa única leitura limitada [min, max) da
//! imagem. O frame só é alocado depois que classificação e leitura
//! deram certo — caminho de erro não vaza frame.

use crate::mm::config::PAGE_SIZE;
use crate::mm::pmm::PageManager;
use crate::sched::exec::elf::{ElfHeader, ProgramHeader, EHDR_SIZE, PHDR_SIZE, PT_LOAD};
use crate::sched::exec::LoadError;
use crate::sync::Mutex;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

/// Fonte de bytes da imagem executável (arquivo, buffer, partição).
pub trait ImageSource: Send {
    /// Lê até `buf.len()` bytes a partir de `offset`; devolve quantos
    /// leu (menos que o pedido = imagem termina antes).
    fn read_at(&mut self, offset: u32, buf: &mut [u8]) -> Result<usize, LoadError>;
}

impl ImageSource for Vec<u8> {
    fn read_at(&mut self, offset: u32, buf: &mut [u8]) -> Result<usize, LoadError> {
        let off = offset as usize;
        if off >= self.len() {
            return Ok(0);
        }
        let n = core::cmp::min(buf.len(), self.len() - off);
        buf[..n].copy_from_slice(&self[off..off + n]);
        Ok(n)
    }
}

/// Espaço de endereçamento do processo sendo carregado.
pub trait AddressSpace {
    /// Página virtual `vpn` já tem frame mapeado?
    fn is_mapped(&self, vpn: u32) -> bool;
    /// Mapeia o frame `ppn` em `vpn` com o conteúdo dado (PAGE_SIZE
    /// bytes).
    fn map_page(&mut self, vpn: u32, ppn: usize, contents: &[u8]);
}

/// Trecho file-backed coalescido de uma página.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PagePart {
    file_offset: u32,
    page_offset: usize,
    len: usize,
}

/// Estado mutável do carregador, sob o Mutex por-loader.
struct LoaderInner<S> {
    source: S,
}

/// Um carregador por binário em execução. Faults concorrentes de
/// threads irmãs são serializados pelo Mutex interno, então uma página
/// nunca é mapeada duas vezes.
pub struct Loader<S: ImageSource> {
    hdr: ElfHeader,
    phdrs: Vec<ProgramHeader>,
    inner: Mutex<LoaderInner<S>>,
    pm: Arc<PageManager>,
}

impl<S: ImageSource> Loader<S> {
    /// Valida o cabeçalho e materializa os program headers PT_LOAD.
    pub fn new(mut source: S, pm: Arc<PageManager>) -> Result<Self, LoadError> {
        let mut ehdr = [0u8; EHDR_SIZE];
        if source.read_at(0, &mut ehdr)? != EHDR_SIZE {
            return Err(LoadError::TruncatedImage);
        }
        let hdr = ElfHeader::parse(&ehdr)?;

        let mut phdrs = Vec::with_capacity(hdr.e_phnum as usize);
        let mut rec = [0u8; PHDR_SIZE];
        for n in 0..hdr.e_phnum as u32 {
            let off = hdr.e_phoff + n * PHDR_SIZE as u32;
            if source.read_at(off, &mut rec)? != PHDR_SIZE {
                return Err(LoadError::TruncatedImage);
            }
            let ph = ProgramHeader::parse(&rec)?;
            if ph.p_type == PT_LOAD {
                phdrs.push(ph);
            }
        }
        crate::kdebug!(
            "(Loader) binario valido: entry {:#x}, {} segmento(s) PT_LOAD",
            hdr.e_entry,
            phdrs.len()
        );
        let sched = pm.scheduler().clone();
        Ok(Self {
            hdr,
            phdrs,
            inner: Mutex::new(LoaderInner { source }, sched),
            pm,
        })
    }

    pub fn entry_point(&self) -> u32 {
        self.hdr.e_entry
    }

    /// Resolve o fault em `vaddr`: classifica os bytes da página,
    /// coalesce os trechos file-backed, lê, compõe e mapeia um frame.
    ///
    /// Página já mapeada sob o lock é corrida benigna (outra thread
    /// resolveu o mesmo fault primeiro) e retorna sem efeito.
    pub fn load_page(
        &self,
        aspace: &mut dyn AddressSpace,
        vaddr: u32,
    ) -> Result<(), LoadError> {
        let vpn = vaddr / PAGE_SIZE as u32;
        let page_base = vpn * PAGE_SIZE as u32;
        let mut inner = self.inner.lock();

        if aspace.is_mapped(vpn) {
            crate::ktrace!("(Loader) pagina {:#x} ja mapeada, fault benigno", page_base);
            return Ok(());
        }

        let parts = self.classify_page(page_base, vaddr)?;

        let mut page = vec![0u8; PAGE_SIZE];
        if !parts.is_empty() {
            // Uma única leitura limitada cobrindo [min, max) dos offsets
            // file-backed necessários.
            let min = parts.iter().map(|p| p.file_offset).min().unwrap_or(0);
            let max = parts
                .iter()
                .map(|p| p.file_offset + p.len as u32)
                .max()
                .unwrap_or(0);
            let mut span = vec![0u8; (max - min) as usize];
            if inner.source.read_at(min, &mut span)? != span.len() {
                return Err(LoadError::TruncatedImage);
            }
            for part in &parts {
                let src = (part.file_offset - min) as usize;
                page[part.page_offset..part.page_offset + part.len]
                    .copy_from_slice(&span[src..src + part.len]);
            }
        }

        let ppn = self.pm.alloc_page();
        aspace.map_page(vpn, ppn, &page);
        crate::ktrace!(
            "(Loader) pagina {:#x} mapeada no frame {} ({} trecho(s) do arquivo)",
            page_base,
            ppn,
            parts.len()
        );
        Ok(())
    }

    /// Classifica byte a byte e coalesce os trechos file-backed.
    ///
    /// Byte presente em dois segmentos ao mesmo tempo é binário
    /// defeituoso e erro duro. Página sem nenhum byte em segmento algum
    /// é acesso inválido do processo.
    fn classify_page(&self, page_base: u32, vaddr: u32) -> Result<Vec<PagePart>, LoadError> {
        let mut parts: Vec<PagePart> = Vec::new();
        let mut any = false;
        for i in 0..PAGE_SIZE as u32 {
            let va = page_base + i;
            let mut file_offset = None;
            // Quantos segmentos reivindicam este byte, file-backed OU bss:
            // mais de um é binário defeituoso, tanto faz a combinação.
            let mut claims = 0u8;
            for ph in &self.phdrs {
                if let Some(off) = ph.file_offset_of(va) {
                    claims += 1;
                    file_offset = Some(off);
                } else if ph.is_bss(va) {
                    claims += 1;
                }
                if claims > 1 {
                    crate::kerror!(
                        "(Loader) byte {:#x} presente em dois segmentos",
                        va
                    );
                    return Err(LoadError::OverlappingSegments);
                }
            }
            if claims > 0 {
                any = true;
            }
            if let Some(off) = file_offset {
                match parts.last_mut() {
                    // Contíguo no arquivo E na página: estende o trecho.
                    Some(last)
                        if last.file_offset + last.len as u32 == off
                            && last.page_offset + last.len == i as usize =>
                    {
                        last.len += 1;
                    }
                    _ => parts.push(PagePart {
                        file_offset: off,
                        page_offset: i as usize,
                        len: 1,
                    }),
                }
            }
        }
        if !any {
            crate::kwarn!("(Loader) acesso invalido em {:#x}", vaddr);
            return Err(LoadError::InvalidAccess(vaddr));
        }
        Ok(parts)
    }
}
