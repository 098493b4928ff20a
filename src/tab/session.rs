// src/tab/session.rs — Single reusable messaging tab

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::{deep_link, NavigationMode, TabHost, TabRef};
use crate::infra::config::MessagingConfig;
use crate::infra::errors::OutreachError;

/// Which path `navigate_to` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The held handle was still alive and was redirected.
    Reused,
    /// The handle was lost; the named tab was found and adopted.
    Reattached,
    /// A new tab was opened at the service root; the deep link follows
    /// after the settling delay.
    Opened,
    /// The host cannot address tabs by name; the deep link was handed to
    /// it directly and may have landed in a new tab.
    Launched,
}

/// The held handle plus a generation that moves on every navigation,
/// `forget` and drop. A deferred redirect only writes back while its
/// generation is still current.
#[derive(Default)]
struct Slot {
    tab: Option<TabRef>,
    generation: u64,
}

/// Owns at most one handle to the named messaging tab.
///
/// The handle is shared with the deferred redirect task, hence the mutex.
/// Navigations are user-paced; there is no cross-call locking beyond that.
pub struct TabSession {
    host: Arc<dyn TabHost>,
    name: String,
    service_host: String,
    root_url: String,
    settle_delay: Duration,
    slot: Arc<Mutex<Slot>>,
    pending: Option<JoinHandle<()>>,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TabSession {
    pub fn new(host: Arc<dyn TabHost>, config: &MessagingConfig) -> Self {
        Self {
            host,
            name: config.session_name.clone(),
            service_host: config.host.clone(),
            root_url: config.root_url(),
            settle_delay: config.settle_delay(),
            slot: Arc::new(Mutex::new(Slot::default())),
            pending: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handle currently held, alive or not.
    pub fn current(&self) -> Option<TabRef> {
        lock(&self.slot).tab.clone()
    }

    /// Whether a deferred redirect is scheduled and has not finished.
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }

    /// Send the user to the deep link for `recipient`/`message`, reusing the
    /// session tab when possible.
    ///
    /// Must be called from within a tokio runtime: opening a new tab
    /// schedules the deep-link redirect as a task.
    pub fn navigate_to(
        &mut self,
        recipient: &str,
        message: &str,
    ) -> Result<Navigation, OutreachError> {
        let url = deep_link(&self.service_host, recipient, message);
        self.cancel_pending();

        if !self.host.binds_names() {
            return self.launch(&url);
        }

        // Tier 1: the handle we hold.
        let held = self.current().filter(|tab| !self.host.is_closed(tab));
        if let Some(tab) = held {
            match self.show(&tab, &url) {
                Ok(()) => {
                    tracing::debug!(tab = tab.id, "reused session tab");
                    return Ok(Navigation::Reused);
                }
                Err(e) => tracing::debug!(tab = tab.id, "held tab unusable: {e}"),
            }
        }

        // Tier 2: re-attach by name.
        if let Some(tab) = self.host.find_named(&self.name) {
            if !self.host.is_closed(&tab) {
                self.set_tab(Some(tab.clone()));
                match self.show(&tab, &url) {
                    Ok(()) => {
                        tracing::debug!(tab = tab.id, "re-attached to '{}'", self.name);
                        return Ok(Navigation::Reattached);
                    }
                    Err(e) => tracing::debug!(tab = tab.id, "named tab unusable: {e}"),
                }
            }
        }

        // Tier 3: open at the root first so the name binds before the deep
        // link loads.
        let Some(tab) = self.host.open_named(&self.root_url, &self.name) else {
            self.set_tab(None);
            tracing::warn!("messaging tab refused by the browser");
            return Err(OutreachError::PopupBlocked);
        };
        self.set_tab(Some(tab.clone()));
        tracing::info!(tab = tab.id, "opened session tab '{}'", self.name);
        self.schedule_redirect(tab, url);
        Ok(Navigation::Opened)
    }

    /// Wait for a scheduled redirect, if any, to finish.
    pub async fn settle(&mut self) {
        if let Some(pending) = self.pending.take() {
            let _ = pending.await;
        }
    }

    /// Drop the handle and any scheduled redirect. The named tab itself is
    /// left open, so the next navigation can re-attach to it.
    pub fn forget(&mut self) {
        self.cancel_pending();
        self.set_tab(None);
    }

    // No name to bind, so no root-first step and nothing to reuse later.
    fn launch(&mut self, url: &str) -> Result<Navigation, OutreachError> {
        if self.host.open_named(url, &self.name).is_none() {
            tracing::warn!("messaging link refused by the browser");
            return Err(OutreachError::PopupBlocked);
        }
        tracing::info!("handed messaging link to the browser");
        Ok(Navigation::Launched)
    }

    fn set_tab(&self, tab: Option<TabRef>) {
        lock(&self.slot).tab = tab;
    }

    fn show(&self, tab: &TabRef, url: &str) -> Result<(), OutreachError> {
        self.host.redirect(tab, url, NavigationMode::Replace)?;
        self.host.focus(tab)
    }

    // Bumps the generation even when nothing is pending: `abort` only lands
    // at an await point, and a task already past its sleep must see it.
    fn cancel_pending(&mut self) {
        lock(&self.slot).generation += 1;
        if let Some(pending) = self.pending.take() {
            if !pending.is_finished() {
                tracing::debug!("cancelling scheduled redirect");
            }
            pending.abort();
        }
    }

    fn schedule_redirect(&mut self, tab: TabRef, url: String) {
        let host = Arc::clone(&self.host);
        let slot = Arc::clone(&self.slot);
        let name = self.name.clone();
        let delay = self.settle_delay;
        let generation = lock(&self.slot).generation;
        let is_current = move |slot: &Mutex<Slot>| lock(slot).generation == generation;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !is_current(&slot) {
                return;
            }

            let shown = host
                .redirect(&tab, &url, NavigationMode::Push)
                .and_then(|()| host.focus(&tab));
            let Err(e) = shown else {
                return;
            };
            if !is_current(&slot) {
                tracing::debug!(tab = tab.id, "deferred redirect failed after cancel: {e}");
                return;
            }

            tracing::debug!(tab = tab.id, "deferred redirect failed: {e}; reopening");
            let reopened = host.open_named(&url, &name);
            if reopened.is_none() {
                tracing::warn!("fallback open of '{name}' refused by the browser");
            }
            let mut current = lock(&slot);
            if current.generation == generation {
                current.tab = reopened;
            }
        }));
    }
}

impl Drop for TabSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::mpsc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Open(String),
        Find,
        Redirect(u64, String, NavigationMode),
        Focus(u64),
    }

    #[derive(Default)]
    struct FakeState {
        next_id: u64,
        tabs: HashMap<String, (TabRef, bool)>,
        calls: Vec<Call>,
        block_popups: bool,
        broken_redirects: bool,
        /// Fail this many upcoming redirects, then recover.
        fail_next_redirects: usize,
        unnamed: bool,
    }

    /// Holds the deferred redirect inside the host call until released.
    struct Gate {
        entered: mpsc::Sender<()>,
        release: mpsc::Receiver<()>,
    }

    #[derive(Default)]
    struct FakeHost {
        state: Mutex<FakeState>,
        push_gate: Mutex<Option<Gate>>,
    }

    impl FakeHost {
        fn calls(&self) -> Vec<Call> {
            self.state.lock().unwrap().calls.clone()
        }

        fn opens(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::Open(_)))
                .count()
        }

        /// A tab bound to `name` by someone else, e.g. an earlier page load.
        fn bind(&self, name: &str) -> TabRef {
            let mut s = self.state.lock().unwrap();
            s.next_id += 1;
            let tab = TabRef {
                id: s.next_id,
                name: name.to_string(),
            };
            s.tabs.insert(name.to_string(), (tab.clone(), false));
            tab
        }

        fn fail_next_redirects(&self, n: usize) {
            self.state.lock().unwrap().fail_next_redirects = n;
        }

        fn close_all(&self) {
            for (_, closed) in self.state.lock().unwrap().tabs.values_mut() {
                *closed = true;
            }
        }
    }

    impl TabHost for FakeHost {
        fn open_named(&self, url: &str, name: &str) -> Option<TabRef> {
            let mut s = self.state.lock().unwrap();
            s.calls.push(Call::Open(url.to_string()));
            if s.block_popups {
                return None;
            }
            s.next_id += 1;
            let tab = TabRef {
                id: s.next_id,
                name: name.to_string(),
            };
            s.tabs.insert(name.to_string(), (tab.clone(), false));
            Some(tab)
        }

        fn find_named(&self, name: &str) -> Option<TabRef> {
            let mut s = self.state.lock().unwrap();
            s.calls.push(Call::Find);
            s.tabs.get(name).map(|(t, _)| t.clone())
        }

        fn is_closed(&self, tab: &TabRef) -> bool {
            let s = self.state.lock().unwrap();
            s.tabs
                .get(&tab.name)
                .map(|(t, closed)| t.id != tab.id || *closed)
                .unwrap_or(true)
        }

        fn redirect(
            &self,
            tab: &TabRef,
            url: &str,
            mode: NavigationMode,
        ) -> Result<(), OutreachError> {
            {
                let mut s = self.state.lock().unwrap();
                s.calls.push(Call::Redirect(tab.id, url.to_string(), mode));
                if s.broken_redirects {
                    return Err(OutreachError::Tab("closed".into()));
                }
                if s.fail_next_redirects > 0 {
                    s.fail_next_redirects -= 1;
                    return Err(OutreachError::Tab("navigation denied".into()));
                }
            }
            if mode == NavigationMode::Push {
                let gate = self.push_gate.lock().unwrap().take();
                if let Some(gate) = gate {
                    gate.entered.send(()).unwrap();
                    gate.release.recv().unwrap();
                    return Err(OutreachError::Tab("closed meanwhile".into()));
                }
            }
            Ok(())
        }

        fn binds_names(&self) -> bool {
            !self.state.lock().unwrap().unnamed
        }

        fn focus(&self, tab: &TabRef) -> Result<(), OutreachError> {
            self.state.lock().unwrap().calls.push(Call::Focus(tab.id));
            Ok(())
        }
    }

    fn config() -> MessagingConfig {
        MessagingConfig {
            host: "web.whatsapp.com".into(),
            session_name: "WHATS_ZHAZ".into(),
            settle_delay_ms: 5,
        }
    }

    const LINK: &str = "https://web.whatsapp.com/send?phone=5511999999999&text=Hi";

    #[tokio::test]
    async fn test_first_navigation_opens_root_then_redirects_once() {
        let host = Arc::new(FakeHost::default());
        let mut session = TabSession::new(host.clone(), &config());

        let nav = session.navigate_to("5511999999999", "Hi").unwrap();
        assert_eq!(nav, Navigation::Opened);
        session.settle().await;

        assert_eq!(
            host.calls(),
            vec![
                Call::Find,
                Call::Open("https://web.whatsapp.com".into()),
                Call::Redirect(1, LINK.into(), NavigationMode::Push),
                Call::Focus(1),
            ]
        );
    }

    #[tokio::test]
    async fn test_second_navigation_reuses_live_handle() {
        let host = Arc::new(FakeHost::default());
        let mut session = TabSession::new(host.clone(), &config());

        session.navigate_to("5511999999999", "Hi").unwrap();
        session.settle().await;
        let nav = session.navigate_to("5511888888888", "Again").unwrap();

        assert_eq!(nav, Navigation::Reused);
        assert_eq!(host.opens(), 1);
        assert_eq!(session.current().unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_lost_handle_reattaches_by_name() {
        let host = Arc::new(FakeHost::default());
        let mut session = TabSession::new(host.clone(), &config());
        session.navigate_to("1", "a").unwrap();
        session.settle().await;

        session.forget();
        assert!(session.current().is_none());

        let nav = session.navigate_to("1", "b").unwrap();
        assert_eq!(nav, Navigation::Reattached);
        assert_eq!(host.opens(), 1);
        assert_eq!(session.current().unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_closed_tab_is_recreated() {
        let host = Arc::new(FakeHost::default());
        let mut session = TabSession::new(host.clone(), &config());
        session.navigate_to("1", "a").unwrap();
        session.settle().await;

        host.close_all();
        let nav = session.navigate_to("1", "b").unwrap();
        session.settle().await;

        assert_eq!(nav, Navigation::Opened);
        assert_eq!(host.opens(), 2);
        assert_eq!(session.current().unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_popup_blocked_surfaces_error() {
        let host = Arc::new(FakeHost::default());
        host.state.lock().unwrap().block_popups = true;
        let mut session = TabSession::new(host.clone(), &config());

        let err = session.navigate_to("1", "a").unwrap_err();
        assert!(matches!(err, OutreachError::PopupBlocked));
        assert!(session.current().is_none());
        assert!(!session.has_pending());
        assert_eq!(host.opens(), 1);
    }

    #[tokio::test]
    async fn test_failed_deferred_redirect_reopens_deep_link() {
        let host = Arc::new(FakeHost::default());
        host.state.lock().unwrap().broken_redirects = true;
        let mut session = TabSession::new(host.clone(), &config());

        session.navigate_to("5511999999999", "Hi").unwrap();
        session.settle().await;

        let opens: Vec<Call> = host
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Open(_)))
            .collect();
        assert_eq!(
            opens,
            vec![
                Call::Open("https://web.whatsapp.com".into()),
                Call::Open(LINK.into()),
            ]
        );
        assert_eq!(session.current().unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_new_navigation_cancels_scheduled_redirect() {
        let host = Arc::new(FakeHost::default());
        let mut cfg = config();
        cfg.settle_delay_ms = 60_000;
        let mut session = TabSession::new(host.clone(), &cfg);

        session.navigate_to("1", "first").unwrap();
        assert!(session.has_pending());
        let nav = session.navigate_to("1", "second").unwrap();
        assert_eq!(nav, Navigation::Reused);
        assert!(!session.has_pending());

        let redirects: Vec<Call> = host
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Redirect(..)))
            .collect();
        assert_eq!(
            redirects,
            vec![Call::Redirect(
                1,
                "https://web.whatsapp.com/send?phone=1&text=second".into(),
                NavigationMode::Replace
            )]
        );
    }

    #[tokio::test]
    async fn test_held_tab_refusing_redirect_falls_back_to_named_tab() {
        let host = Arc::new(FakeHost::default());
        let mut session = TabSession::new(host.clone(), &config());
        session.navigate_to("1", "a").unwrap();
        session.settle().await;

        host.fail_next_redirects(1);
        let nav = session.navigate_to("1", "b").unwrap();

        assert_eq!(nav, Navigation::Reattached);
        assert_eq!(host.opens(), 1);
        let replaces = host
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Redirect(1, _, NavigationMode::Replace)))
            .count();
        assert_eq!(replaces, 2);
    }

    #[tokio::test]
    async fn test_named_tab_refusing_redirect_opens_exactly_one_tab() {
        let host = Arc::new(FakeHost::default());
        let stale = host.bind("WHATS_ZHAZ");
        let mut session = TabSession::new(host.clone(), &config());

        host.fail_next_redirects(1);
        let nav = session.navigate_to("5511999999999", "Hi").unwrap();
        session.settle().await;

        assert_eq!(nav, Navigation::Opened);
        assert_eq!(host.opens(), 1);
        let current = session.current().unwrap();
        assert_ne!(current.id, stale.id);
        assert!(host
            .calls()
            .contains(&Call::Redirect(current.id, LINK.into(), NavigationMode::Push)));
    }

    #[tokio::test]
    async fn test_unnamed_host_gets_deep_link_directly() {
        let host = Arc::new(FakeHost::default());
        host.state.lock().unwrap().unnamed = true;
        let mut session = TabSession::new(host.clone(), &config());

        let first = session.navigate_to("5511999999999", "Hi").unwrap();
        let second = session.navigate_to("5511888888888", "Again").unwrap();

        assert_eq!(first, Navigation::Launched);
        assert_eq!(second, Navigation::Launched);
        assert!(!session.has_pending());
        assert_eq!(
            host.calls(),
            vec![
                Call::Open(LINK.into()),
                Call::Open("https://web.whatsapp.com/send?phone=5511888888888&text=Again".into()),
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_forget_wins_over_redirect_already_in_flight() {
        let host = Arc::new(FakeHost::default());
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *host.push_gate.lock().unwrap() = Some(Gate {
            entered: entered_tx,
            release: release_rx,
        });
        let mut cfg = config();
        cfg.settle_delay_ms = 1;
        let mut session = TabSession::new(host.clone(), &cfg);

        session.navigate_to("5511999999999", "Hi").unwrap();
        entered_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("deferred redirect never ran");

        // The task is parked inside the host call; abort cannot reach it.
        session.forget();
        release_tx.send(()).unwrap();

        // The task holds one host clone until it finishes.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while Arc::strong_count(&host) > 2 {
            assert!(std::time::Instant::now() < deadline, "deferred task hung");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert!(session.current().is_none());
        assert_eq!(host.opens(), 1);
    }
}
