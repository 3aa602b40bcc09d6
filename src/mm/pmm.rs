//! Physical Memory Manager (PMM).
//!
//! Gerencia a ocupação dos frames físicos (páginas de 4KiB) usando um
//! Bitmap (bit setado = frame em uso) mais um hint
//! `lowest_unreserved_page` que poda o início do scan. O hint é um limite
//! inferior conservador: nunca passa do primeiro frame realmente livre,
//! avança depois de scans e volta em frees.
//!
//! Alocação sem frame disponível NÃO dorme de verdade: não existe sinal
//! de "frame liberado", então o alocador cede a CPU (`yield_now`) e refaz
//! o scan inteiro. Sob exaustão permanente isso é starvation — por
//! design.

use crate::klib::bitmap::Bitmap;
use crate::mm::config::PAGE_SIZE;
use crate::sched::SchedulerRef;
use crate::sync::Mutex;

/// Estado do alocador, protegido pelo Mutex do PageManager.
struct PmState {
    /// Bit setado ⇔ frame em uso.
    page_usage_table: Bitmap,
    /// Hint conservador: ≤ índice do primeiro frame livre.
    lowest_unreserved_page: usize,
}

/// Alocador de frames físicos.
///
/// Criado uma vez no boot; todo subsistema que precisa de frames recebe
/// uma referência (`Arc<PageManager>`). Ordem de init: PageManager antes
/// das threads do scheduler. Invariante: todo frame marcado livre na
/// tabela está de fato desmapeado e sem uso por kernel ou processo.
pub struct PageManager {
    total_pages: usize,
    state: Mutex<PmState>,
    sched: SchedulerRef,
}

impl PageManager {
    /// Cria o alocador com `total_pages` frames, sendo os primeiros
    /// `boot_reserved` marcados como usados (kernel, memória baixa).
    pub fn new(total_pages: usize, boot_reserved: usize, sched: SchedulerRef) -> Self {
        assert!(boot_reserved <= total_pages);
        let mut table = Bitmap::new(total_pages);
        for p in 0..boot_reserved {
            table.set(p);
        }
        crate::kinfo!(
            "(PMM) Inicializado: {} frames, {} reservados no boot",
            total_pages,
            boot_reserved
        );
        Self {
            total_pages,
            state: Mutex::new(
                PmState {
                    page_usage_table: table,
                    lowest_unreserved_page: boot_reserved,
                },
                sched.clone(),
            ),
            sched,
        }
    }

    /// Marca um buraco do mapa de boot (módulos, imagem do kernel) como
    /// reservado. Só faz sentido antes das threads começarem.
    pub fn reserve_range(&self, start: usize, count: usize) {
        let mut st = self.state.lock();
        for p in start..start + count {
            st.page_usage_table.set(p);
        }
        while st.lowest_unreserved_page < self.total_pages
            && st.page_usage_table.test(st.lowest_unreserved_page)
        {
            st.lowest_unreserved_page += 1;
        }
        crate::kdebug!("(PMM) Reservado boot-range [{}, {})", start, start + count);
    }

    /// Número total de frames gerenciados.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Handle do scheduler usado pelo alocador (compartilhado com quem
    /// precisa criar locks no mesmo contexto, ex.: o Loader).
    pub fn scheduler(&self) -> &SchedulerRef {
        &self.sched
    }

    /// Reserva recursiva de um run contíguo de `num` frames a partir de
    /// `ppn`. Os bits são setados de trás para frente (no retorno da
    /// recursão), então uma falha no meio do run não deixa bit perdido
    /// além do ponto de falha.
    fn reserve_pages(&self, st: &mut PmState, ppn: usize, num: usize) -> bool {
        if ppn < self.total_pages && !st.page_usage_table.test(ppn) {
            if num == 1 || self.reserve_pages(st, ppn + 1, num - 1) {
                st.page_usage_table.set(ppn);
                return true;
            }
        }
        false
    }

    /// Aloca um run contíguo de `page_size` bytes e retorna o índice do
    /// primeiro frame (PPN).
    ///
    /// `page_size` deve ser múltiplo positivo de PAGE_SIZE — violar isso
    /// é erro de programação, fatal. Candidatos são apenas índices
    /// alinhados ao tamanho pedido. Sem run livre: solta o lock, cede a
    /// CPU e refaz o scan (spin cooperativo; nenhuma fairness além da
    /// ordem do scan).
    pub fn alloc_ppn(&self, page_size: usize) -> usize {
        assert!(
            page_size > 0 && page_size % PAGE_SIZE == 0,
            "alloc_ppn: page_size {} não é múltiplo de PAGE_SIZE",
            page_size
        );
        let num = page_size / PAGE_SIZE;
        loop {
            let mut st = self.state.lock();
            let mut found = None;
            let mut p = st.lowest_unreserved_page;
            while p < self.total_pages {
                if p % num == 0 && self.reserve_pages(&mut st, p, num) {
                    found = Some(p);
                    break;
                }
                p += 1;
            }
            // Avança o hint por cima do prefixo agora totalmente reservado.
            while st.lowest_unreserved_page < self.total_pages
                && st.page_usage_table.test(st.lowest_unreserved_page)
            {
                st.lowest_unreserved_page += 1;
            }
            drop(st);
            if let Some(ppn) = found {
                crate::ktrace!("(PMM) alloc_ppn: run de {} frame(s) em {}", num, ppn);
                return ppn;
            }
            crate::kdebug!("(PMM) alloc_ppn: sem run de {} frame(s), yield", num);
            self.sched.yield_now();
        }
    }

    /// Libera o run que começa em `ppn`. Double-free é fatal.
    pub fn free_ppn(&self, ppn: usize, page_size: usize) {
        assert!(
            page_size > 0 && page_size % PAGE_SIZE == 0,
            "free_ppn: page_size {} não é múltiplo de PAGE_SIZE",
            page_size
        );
        let mut st = self.state.lock();
        if ppn < st.lowest_unreserved_page {
            st.lowest_unreserved_page = ppn;
        }
        for p in ppn..ppn + page_size / PAGE_SIZE {
            assert!(
                st.page_usage_table.test(p),
                "free_ppn: double free do frame {}",
                p
            );
            st.page_usage_table.clear(p);
        }
        crate::ktrace!("(PMM) free_ppn: {} ({} bytes)", ppn, page_size);
    }

    /// Aloca um único frame.
    pub fn alloc_page(&self) -> usize {
        self.alloc_ppn(PAGE_SIZE)
    }

    /// Libera um único frame.
    pub fn free_page(&self, ppn: usize) {
        self.free_ppn(ppn, PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::testing::HostScheduler;
    use std::sync::Arc;

    fn pm(total: usize, reserved: usize) -> Arc<PageManager> {
        let sched: SchedulerRef = HostScheduler::new();
        Arc::new(PageManager::new(total, reserved, sched))
    }

    #[test]
    fn test_cenario_256_frames() {
        // 256 frames, 10 reservados no boot: 5 allocs crescentes >= 10,
        // free do 3º e realloc devolve o mesmo índice (first-fit).
        let pm = pm(256, 10);
        let mut got = Vec::new();
        for _ in 0..5 {
            got.push(pm.alloc_page());
        }
        for w in got.windows(2) {
            assert!(w[0] < w[1]);
        }
        assert!(got[0] >= 10);
        pm.free_page(got[2]);
        assert_eq!(pm.alloc_page(), got[2]);
    }

    #[test]
    fn test_sem_overlap() {
        let pm = pm(64, 1);
        let a = pm.alloc_ppn(4 * PAGE_SIZE);
        let b = pm.alloc_ppn(4 * PAGE_SIZE);
        let c = pm.alloc_ppn(PAGE_SIZE);
        assert!(a + 4 <= b || b + 4 <= a);
        assert!(!(a..a + 4).contains(&c));
        assert!(!(b..b + 4).contains(&c));
    }

    #[test]
    fn test_alinhamento_e_rollback() {
        let pm = pm(64, 0);
        // Ocupa os frames 0..6 um a um; o frame 5 fica no meio do
        // candidato alinhado [4, 8).
        for expected in 0..6 {
            assert_eq!(pm.alloc_page(), expected);
        }
        pm.free_page(4);
        // Run de 4 frames: candidato 4 falha no frame 5 (reserva parcial
        // desfeita), próximo candidato alinhado é 8.
        let run = pm.alloc_ppn(4 * PAGE_SIZE);
        assert_eq!(run, 8);
        // O frame 4 continua livre — nenhum bit perdido pelo rollback.
        assert_eq!(pm.alloc_page(), 4);
    }

    #[test]
    fn test_hint_monotonico() {
        let pm = pm(32, 2);
        let a = pm.alloc_page();
        let b = pm.alloc_page();
        assert_eq!((a, b), (2, 3));
        pm.free_page(a);
        // hint voltou para `a`: o próximo alloc devolve exatamente `a`
        assert_eq!(pm.alloc_page(), a);
    }

    #[test]
    #[should_panic]
    fn test_page_size_desalinhado_fatal() {
        let pm = pm(16, 0);
        pm.alloc_ppn(PAGE_SIZE + 1);
    }

    #[test]
    #[should_panic]
    fn test_double_free_fatal() {
        let pm = pm(16, 0);
        let p = pm.alloc_page();
        pm.free_page(p);
        pm.free_page(p);
    }

    #[test]
    fn test_exaustao_yield_e_retry() {
        // Alocador cheio: alloc em outra thread gira em yield até o free.
        let pm = pm(8, 0);
        let mut held = Vec::new();
        for _ in 0..8 {
            held.push(pm.alloc_page());
        }
        let pm2 = pm.clone();
        let h = std::thread::spawn(move || pm2.alloc_page());
        std::thread::sleep(std::time::Duration::from_millis(20));
        pm.free_page(held[4]);
        assert_eq!(h.join().unwrap(), held[4]);
    }

    #[test]
    fn test_reserve_range() {
        let pm = pm(32, 1);
        pm.reserve_range(1, 7);
        assert_eq!(pm.alloc_page(), 8);
    }
}
