// core/src/subscription.rs

//! Follower-author subscriptions: the same absent/present state machine as
//! recipe relations, plus the rule that nobody follows themselves.

use crate::error::{CoreError, CoreResult};
use crate::model::{SubscriptionView, User, UserId, UserView};
use crate::pagination::{Page, PageRequest};
use crate::relation::RelationChange;
use crate::store::{InsertOutcome, RecipeStore, UserStore};
use tracing::{info, instrument};

pub async fn user_view<S>(store: &S, viewer: Option<UserId>, user: User) -> CoreResult<UserView>
where
  S: UserStore + ?Sized,
{
  let is_subscribed = match viewer {
    Some(viewer) if viewer != user.id => store.is_subscribed(viewer, user.id).await?,
    _ => false,
  };
  Ok(UserView { user, is_subscribed })
}

pub async fn load_author<S>(store: &S, author: UserId) -> CoreResult<User>
where
  S: UserStore + ?Sized,
{
  store
    .get_user(author)
    .await?
    .ok_or_else(|| CoreError::not_found("User", author))
}

#[instrument(name = "subscription::apply_change", skip(store))]
pub async fn apply_subscription_change<S>(
  store: &S,
  change: RelationChange,
  follower: UserId,
  author: UserId,
) -> CoreResult<()>
where
  S: UserStore + ?Sized,
{
  if follower == author {
    return Err(CoreError::SelfSubscription);
  }
  match change {
    RelationChange::Add => match store.insert_subscription(follower, author).await? {
      InsertOutcome::Inserted => {
        info!("Subscribed.");
        Ok(())
      }
      InsertOutcome::AlreadyPresent => Err(CoreError::DuplicateSubscription { author_id: author }),
    },
    RelationChange::Remove => {
      if store.remove_subscription(follower, author).await? {
        info!("Unsubscribed.");
        Ok(())
      } else {
        Err(CoreError::MissingSubscription { author_id: author })
      }
    }
  }
}

/// `author` as seen by `viewer`, with up to `recipes_limit` of their recipes.
pub async fn subscription_view<S>(
  store: &S,
  viewer: UserId,
  author: User,
  recipes_limit: Option<u32>,
) -> CoreResult<SubscriptionView>
where
  S: UserStore + RecipeStore + ?Sized,
{
  let recipes = store.author_recipes(author.id, recipes_limit).await?;
  let recipes_count = store.count_author_recipes(author.id).await?;
  let author = user_view(store, Some(viewer), author).await?;
  Ok(SubscriptionView {
    author,
    recipes,
    recipes_count,
  })
}

#[instrument(name = "subscription::list", skip(store))]
pub async fn list_subscriptions<S>(
  store: &S,
  follower: UserId,
  page: PageRequest,
  recipes_limit: Option<u32>,
) -> CoreResult<Page<SubscriptionView>>
where
  S: UserStore + RecipeStore + ?Sized,
{
  let authors = store.list_subscriptions(follower, page).await?;
  let mut views = Vec::with_capacity(authors.results.len());
  for author in &authors.results {
    views.push(subscription_view(store, follower, author.clone(), recipes_limit).await?);
  }
  Ok(Page::new(page, authors.count, views))
}
