//! Drives a `RequirementFormView` over a `Transport`.
//!
//! # Design
//! The programs fetch is a child task of the session, held in a `JoinSet`.
//! Closing or dropping the session aborts it, so no request outlives the
//! form that issued it. Submissions are awaited inline: the view is busy for
//! exactly as long as the request is in flight.

use portal_core::{
    FormError, HttpResponse, LoadTicket, Navigator, Notifier, RequirementFormView, SubmitOutcome, TransportError,
};
use tokio::task::JoinSet;

use crate::transport::Transport;

type LoadResult = (LoadTicket, Result<HttpResponse, TransportError>);

pub struct FormSession<T, N, S> {
    view: RequirementFormView<N, S>,
    transport: T,
    tasks: JoinSet<LoadResult>,
}

impl<T, N, S> FormSession<T, N, S>
where
    T: Transport,
    N: Navigator,
    S: Notifier,
{
    /// Open the form and start loading the programs dropdown in the
    /// background. Must be called inside a tokio runtime.
    pub fn open(mut view: RequirementFormView<N, S>, transport: T) -> Self {
        let mut tasks = JoinSet::new();
        if let Some((ticket, request)) = view.begin_load_programs() {
            let transport = transport.clone();
            tasks.spawn(async move { (ticket, transport.execute(request).await) });
        }
        Self { view, transport, tasks }
    }

    pub fn view(&self) -> &RequirementFormView<N, S> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut RequirementFormView<N, S> {
        &mut self.view
    }

    /// Wait for the programs load to settle and apply it.
    pub async fn programs_ready(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            self.apply(joined);
        }
    }

    /// Apply any load that already finished, without waiting.
    fn apply_finished(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            self.apply(joined);
        }
    }

    fn apply(&mut self, joined: Result<LoadResult, tokio::task::JoinError>) {
        match joined {
            Ok((ticket, outcome)) => {
                self.view.finish_load_programs(ticket, outcome);
            }
            Err(error) if error.is_cancelled() => {}
            Err(error) => tracing::warn!(%error, "programs load task failed"),
        }
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        self.apply_finished();
        let request = self.view.begin_submit()?;
        let outcome = self.transport.execute(request).await;
        self.view.finish_submit(outcome)
    }

    /// Abort outstanding work and tear the view down. The view is returned
    /// so the caller can still read what it reported.
    pub fn close(self) -> RequirementFormView<N, S> {
        let Self {
            mut view, mut tasks, ..
        } = self;
        if !tasks.is_empty() {
            tracing::debug!(pending = tasks.len(), "aborting form tasks");
        }
        tasks.abort_all();
        view.teardown();
        view
    }
}
