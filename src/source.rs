// Backend seams and the local JSON backend behind them.
use crate::context::SharedContext;
use crate::model::{Artist, Artwork, RawEvent, UserProfile};
use crate::storage::LocalStorage;
use anyhow::Result;
use std::future::Future;

/// Anything that can deliver the event collection in one read.
pub trait EventSource: Send + Sync {
    fn fetch_all_events(&self) -> impl Future<Output = Result<Vec<RawEvent>>> + Send;
}

/// Read side of the member directory and exhibition.
pub trait DirectorySource: Send + Sync {
    fn fetch_artists(&self) -> impl Future<Output = Result<Vec<Artist>>> + Send;
    fn fetch_artworks(&self) -> impl Future<Output = Result<Vec<Artwork>>> + Send;
    fn fetch_users(&self) -> impl Future<Output = Result<Vec<UserProfile>>> + Send;
}

/// Serves every collection from JSON documents in the data directory.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    ctx: SharedContext,
}

impl LocalBackend {
    pub fn new(ctx: SharedContext) -> Self {
        Self { ctx }
    }

    pub fn add_event(&self, event: RawEvent) -> Result<()> {
        let path = self.ctx.get_events_path()?;
        LocalStorage::update_document(&path, |items: &mut Vec<RawEvent>| items.push(event))
    }

    pub fn add_artists(&self, artists: Vec<Artist>) -> Result<()> {
        let path = self.ctx.get_artists_path()?;
        LocalStorage::update_document(&path, |items: &mut Vec<Artist>| items.extend(artists))
    }

    pub fn add_artwork(&self, artwork: Artwork) -> Result<()> {
        let path = self.ctx.get_artworks_path()?;
        LocalStorage::update_document(&path, |items: &mut Vec<Artwork>| items.push(artwork))
    }

    /// Edits the user document with id `uid`. `None` when there is none.
    pub fn update_user<F>(&self, uid: &str, f: F) -> Result<Option<UserProfile>>
    where
        F: FnOnce(&mut UserProfile),
    {
        let path = self.ctx.get_users_path()?;
        LocalStorage::update_document(&path, |items: &mut Vec<UserProfile>| {
            items.iter_mut().find(|u| u.uid == uid).map(|u| {
                f(u);
                u.clone()
            })
        })
    }

    /// Edits the artist document with id `uid`. `None` when there is none.
    pub fn update_artist<F>(&self, uid: &str, f: F) -> Result<Option<Artist>>
    where
        F: FnOnce(&mut Artist),
    {
        let path = self.ctx.get_artists_path()?;
        LocalStorage::update_document(&path, |items: &mut Vec<Artist>| {
            items.iter_mut().find(|a| a.id == uid).map(|a| {
                f(a);
                a.clone()
            })
        })
    }

    pub fn load_artists(&self) -> Result<Vec<Artist>> {
        LocalStorage::load_document(&self.ctx.get_artists_path()?)
    }
}

impl EventSource for LocalBackend {
    async fn fetch_all_events(&self) -> Result<Vec<RawEvent>> {
        let path = self.ctx.get_events_path()?;
        tokio::task::spawn_blocking(move || LocalStorage::load_document(&path)).await?
    }
}

impl DirectorySource for LocalBackend {
    async fn fetch_artists(&self) -> Result<Vec<Artist>> {
        let path = self.ctx.get_artists_path()?;
        tokio::task::spawn_blocking(move || LocalStorage::load_document(&path)).await?
    }

    async fn fetch_artworks(&self) -> Result<Vec<Artwork>> {
        let path = self.ctx.get_artworks_path()?;
        tokio::task::spawn_blocking(move || LocalStorage::load_document(&path)).await?
    }

    async fn fetch_users(&self) -> Result<Vec<UserProfile>> {
        let path = self.ctx.get_users_path()?;
        tokio::task::spawn_blocking(move || LocalStorage::load_document(&path)).await?
    }
}
