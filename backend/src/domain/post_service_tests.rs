//! Tests for the post service.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;
use tokio::sync::mpsc;

use super::*;
use crate::domain::ports::{
    MockPostRepository, MockTagCleanupQueue, MockTagRepository, TagCleanupQueueError,
};
use crate::domain::{
    ErrorCode, NewTag, Permission, PostContent, PostContentPatch, Requester, TagName, TagSummary,
};

type TestService = PostService<MockPostRepository, MockTagRepository, MockTagCleanupQueue>;

fn make_service(
    posts: MockPostRepository,
    tags: MockTagRepository,
    cleanup: MockTagCleanupQueue,
) -> TestService {
    PostService::new(Arc::new(posts), Arc::new(tags), Arc::new(cleanup))
}

fn name(raw: &str) -> TagName {
    TagName::new(raw).expect("valid tag name")
}

fn owned_tag(owner_id: UserId, raw: &str) -> Tag {
    Tag {
        id: TagId::random(),
        name: name(raw),
        owner_id,
    }
}

fn post_with_tags(owner_id: UserId, tags: &[&Tag]) -> Post {
    let now = Utc::now();
    Post {
        id: PostId::random(),
        owner_id,
        content: PostContent::new("Hello", "world").expect("valid content"),
        tags: tags.iter().map(|tag| tag.summary()).collect(),
        created_at: now,
        updated_at: now,
    }
}

fn with_summaries(mut post: Post, tags: Vec<TagSummary>) -> Post {
    post.tags = tags;
    post
}

/// Expect `times` mirror links answered with `result`, each reported on the
/// returned channel once the background task has made the call.
fn expect_mirror_links(
    tags: &mut MockTagRepository,
    times: usize,
    result: Result<(), TagRepositoryError>,
) -> mpsc::UnboundedReceiver<TagId> {
    let (sender, receiver) = mpsc::unbounded_channel();
    tags.expect_attach_post()
        .times(times)
        .returning(move |tag_id, _| {
            let _ = sender.send(*tag_id);
            result.clone()
        });
    receiver
}

async fn mirrored_tags(
    receiver: &mut mpsc::UnboundedReceiver<TagId>,
    count: usize,
) -> Vec<TagId> {
    let mut seen = Vec::with_capacity(count);
    for _ in 0..count {
        seen.push(receiver.recv().await.expect("mirror link attempted"));
    }
    seen.sort();
    seen
}

#[tokio::test]
async fn create_provisions_missing_tags_and_connects_all() {
    let owner = UserId::random();
    let infra = owned_tag(owner, "infra");
    let db = owned_tag(owner, "db");
    let stored_tags = vec![infra.clone()];
    let created_db = db.clone();
    let expected_ids = vec![db.id, infra.id];
    let created_post = post_with_tags(owner, &[&db, &infra]);
    let returned_post = created_post.clone();

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner()
        .times(1)
        .return_once(move |_| Ok(stored_tags));
    tags.expect_find_by_owner_and_name()
        .times(1)
        .return_once(|_, _| Ok(None));
    tags.expect_create()
        .withf(|new_tag: &NewTag| new_tag.name.as_ref() == "db")
        .times(1)
        .return_once(move |_| Ok(created_db));
    let mut mirrored = expect_mirror_links(&mut tags, 2, Ok(()));

    let mut posts = MockPostRepository::new();
    posts
        .expect_create()
        .withf(move |new_post: &NewPost| new_post.tag_ids == expected_ids)
        .times(1)
        .return_once(move |_| Ok(returned_post));

    let service = make_service(posts, tags, MockTagCleanupQueue::new());
    let post = service
        .create_post(CreatePostRequest {
            owner_id: owner,
            content: PostContent::new("Hello", "world").expect("valid content"),
            tag_names: vec![name("db"), name("infra"), name("db")],
        })
        .await
        .expect("create succeeds");

    assert_eq!(post, created_post);
    let mut expected = vec![db.id, infra.id];
    expected.sort();
    assert_eq!(mirrored_tags(&mut mirrored, 2).await, expected);
}

#[tokio::test]
async fn create_without_tags_skips_tag_store() {
    let owner = UserId::random();
    let created_post = post_with_tags(owner, &[]);
    let returned_post = created_post.clone();

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner().times(0);
    tags.expect_attach_post().times(0);

    let mut posts = MockPostRepository::new();
    posts
        .expect_create()
        .withf(|new_post: &NewPost| new_post.tag_ids.is_empty())
        .times(1)
        .return_once(move |_| Ok(returned_post));

    let service = make_service(posts, tags, MockTagCleanupQueue::new());
    let post = service
        .create_post(CreatePostRequest {
            owner_id: owner,
            content: PostContent::new("Hello", "world").expect("valid content"),
            tag_names: Vec::new(),
        })
        .await
        .expect("create succeeds");

    assert_eq!(post, created_post);
}

#[tokio::test]
async fn failed_provisioning_writes_no_post() {
    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner().return_once(|_| Ok(Vec::new()));
    tags.expect_find_by_owner_and_name()
        .returning(|_, _| Ok(None));
    tags.expect_create()
        .returning(|_| Err(TagRepositoryError::connection("refused")));

    let mut posts = MockPostRepository::new();
    posts.expect_create().times(0);

    let service = make_service(posts, tags, MockTagCleanupQueue::new());
    let error = service
        .create_post(CreatePostRequest {
            owner_id: UserId::random(),
            content: PostContent::new("Hello", "world").expect("valid content"),
            tag_names: vec![name("go")],
        })
        .await
        .expect_err("provisioning failure propagates");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn mirror_link_failures_do_not_fail_create() {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let stored_tags = vec![go.clone()];
    let created_post = post_with_tags(owner, &[&go]);
    let returned_post = created_post.clone();

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner()
        .return_once(move |_| Ok(stored_tags));
    let mut mirrored =
        expect_mirror_links(&mut tags, 1, Err(TagRepositoryError::query("lock timeout")));

    let mut posts = MockPostRepository::new();
    posts
        .expect_create()
        .return_once(move |_| Ok(returned_post));

    let service = make_service(posts, tags, MockTagCleanupQueue::new());
    let post = service
        .create_post(CreatePostRequest {
            owner_id: owner,
            content: PostContent::new("Hello", "world").expect("valid content"),
            tag_names: vec![name("go")],
        })
        .await
        .expect("create succeeds despite mirror failure");

    assert_eq!(post.id, created_post.id);
    assert_eq!(mirrored_tags(&mut mirrored, 1).await, vec![go.id]);
}

#[tokio::test]
async fn create_provisions_again_when_a_tag_vanishes_before_connect() {
    let owner = UserId::random();
    let stale = owned_tag(owner, "go");
    let fresh = owned_tag(owner, "go");
    let (stale_id, fresh_id) = (stale.id, fresh.id);
    let created_post = post_with_tags(owner, &[&fresh]);
    let returned_post = created_post.clone();

    let mut tags = MockTagRepository::new();
    let mut lookups = 0;
    tags.expect_find_by_owner()
        .times(2)
        .returning(move |_| {
            lookups += 1;
            Ok(if lookups == 1 {
                vec![stale.clone()]
            } else {
                Vec::new()
            })
        });
    tags.expect_find_by_owner_and_name()
        .times(1)
        .return_once(|_, _| Ok(None));
    tags.expect_create()
        .times(1)
        .return_once(move |_| Ok(fresh));

    let mut posts = MockPostRepository::new();
    posts
        .expect_create()
        .withf(move |new_post: &NewPost| new_post.tag_ids == vec![stale_id])
        .times(1)
        .return_once(move |_| Err(PostRepositoryError::unknown_tag(stale_id.to_string())));
    posts
        .expect_create()
        .withf(move |new_post: &NewPost| new_post.tag_ids == vec![fresh_id])
        .times(1)
        .return_once(move |_| Ok(returned_post));

    let service = PostService::with_options(
        Arc::new(posts),
        Arc::new(tags),
        Arc::new(MockTagCleanupQueue::new()),
        PostServiceOptions {
            mirror_tag_links: false,
        },
    );
    let post = service
        .create_post(CreatePostRequest {
            owner_id: owner,
            content: PostContent::new("Hello", "world").expect("valid content"),
            tag_names: vec![name("go")],
        })
        .await
        .expect("create succeeds on the second round");

    assert_eq!(post.tag_ids(), vec![fresh_id]);
}

#[tokio::test]
async fn tags_that_keep_vanishing_fail_the_update() {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let current = post_with_tags(owner, &[]);
    let post_id = current.id;
    let go_id = go.id;

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts
        .expect_update()
        .times(3)
        .returning(move |_, _| Err(PostRepositoryError::unknown_tag(go_id.to_string())));

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner()
        .times(3)
        .returning(move |_| Ok(vec![go.clone()]));

    let mut cleanup = MockTagCleanupQueue::new();
    cleanup.expect_enqueue().times(0);

    let service = make_service(posts, tags, cleanup);
    let error = service
        .update_post(UpdatePostRequest {
            post_id,
            requester_id: owner,
            content: PostContentPatch::default(),
            tag_names: Some(vec![name("go")]),
        })
        .await
        .expect_err("update gives up");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn mirror_links_can_be_disabled() {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let stored_tags = vec![go.clone()];
    let returned_post = post_with_tags(owner, &[&go]);

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner()
        .return_once(move |_| Ok(stored_tags));
    tags.expect_attach_post().times(0);

    let mut posts = MockPostRepository::new();
    posts
        .expect_create()
        .return_once(move |_| Ok(returned_post));

    let service = PostService::with_options(
        Arc::new(posts),
        Arc::new(tags),
        Arc::new(MockTagCleanupQueue::new()),
        PostServiceOptions {
            mirror_tag_links: false,
        },
    );
    service
        .create_post(CreatePostRequest {
            owner_id: owner,
            content: PostContent::new("Hello", "world").expect("valid content"),
            tag_names: vec![name("go")],
        })
        .await
        .expect("create succeeds");
}

#[tokio::test]
async fn update_reconciles_tags_and_queues_removed_ones() {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let infra = owned_tag(owner, "infra");
    let db = owned_tag(owner, "db");
    let current = post_with_tags(owner, &[&go, &infra]);
    let post_id = current.id;
    let updated = with_summaries(current.clone(), vec![infra.summary(), db.summary()]);
    let returned = updated.clone();
    let owner_tags = vec![go.clone(), infra.clone()];
    let created_db = db.clone();
    let (db_id, go_id) = (db.id, go.id);

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(current)));
    posts
        .expect_update()
        .withf(move |id: &PostId, patch: &PostPatch| {
            *id == post_id && patch.connect == vec![db_id] && patch.disconnect == vec![go_id]
        })
        .times(1)
        .return_once(move |_, _| Ok(returned));

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner()
        .times(1)
        .return_once(move |_| Ok(owner_tags));
    tags.expect_find_by_owner_and_name()
        .times(1)
        .return_once(|_, _| Ok(None));
    tags.expect_create()
        .times(1)
        .return_once(move |_| Ok(created_db));

    let mut cleanup = MockTagCleanupQueue::new();
    cleanup
        .expect_enqueue()
        .withf(move |request: &TagCleanupRequest| {
            request.post_id == post_id
                && request.tag_ids == vec![go_id]
                && request.reason == CleanupReason::PostUpdated
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(posts, tags, cleanup);
    let post = service
        .update_post(UpdatePostRequest {
            post_id,
            requester_id: owner,
            content: PostContentPatch::default(),
            tag_names: Some(vec![name("infra"), name("db")]),
        })
        .await
        .expect("update succeeds");

    assert_eq!(post, updated);
}

#[tokio::test]
async fn update_reuses_owned_tag_not_yet_on_post() {
    let owner = UserId::random();
    let rust = owned_tag(owner, "rust");
    let current = post_with_tags(owner, &[]);
    let returned = with_summaries(current.clone(), vec![rust.summary()]);
    let owner_tags = vec![rust.clone()];
    let rust_id = rust.id;

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts
        .expect_update()
        .withf(move |_, patch: &PostPatch| {
            patch.connect == vec![rust_id] && patch.disconnect.is_empty()
        })
        .times(1)
        .return_once(move |_, _| Ok(returned));

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner()
        .return_once(move |_| Ok(owner_tags));
    tags.expect_create().times(0);

    let mut cleanup = MockTagCleanupQueue::new();
    cleanup.expect_enqueue().times(0);

    let service = make_service(posts, tags, cleanup);
    let post = service
        .update_post(UpdatePostRequest {
            post_id: PostId::random(),
            requester_id: owner,
            content: PostContentPatch::default(),
            tag_names: Some(vec![name("rust")]),
        })
        .await
        .expect("update succeeds");

    assert_eq!(post.tag_ids(), vec![rust_id]);
}

#[tokio::test]
async fn update_without_tag_field_leaves_tags_untouched() {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let current = post_with_tags(owner, &[&go]);
    let returned = current.clone();

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts
        .expect_update()
        .withf(|_, patch: &PostPatch| {
            patch.connect.is_empty()
                && patch.disconnect.is_empty()
                && patch.content.title() == Some("Renamed")
        })
        .times(1)
        .return_once(move |_, _| Ok(returned));

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner().times(0);

    let mut cleanup = MockTagCleanupQueue::new();
    cleanup.expect_enqueue().times(0);

    let service = make_service(posts, tags, cleanup);
    service
        .update_post(UpdatePostRequest {
            post_id: PostId::random(),
            requester_id: owner,
            content: PostContentPatch::new(Some("Renamed".to_owned()), None)
                .expect("valid patch"),
            tag_names: None,
        })
        .await
        .expect("update succeeds");
}

#[tokio::test]
async fn empty_tag_list_clears_every_tag() {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let infra = owned_tag(owner, "infra");
    let current = post_with_tags(owner, &[&go, &infra]);
    let returned = with_summaries(current.clone(), Vec::new());
    let removed = vec![go.id, infra.id];
    let queued = removed.clone();

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts
        .expect_update()
        .withf(move |_, patch: &PostPatch| patch.connect.is_empty() && patch.disconnect == removed)
        .times(1)
        .return_once(move |_, _| Ok(returned));

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner().times(0);

    let mut cleanup = MockTagCleanupQueue::new();
    cleanup
        .expect_enqueue()
        .withf(move |request: &TagCleanupRequest| request.tag_ids == queued)
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(posts, tags, cleanup);
    let post = service
        .update_post(UpdatePostRequest {
            post_id: PostId::random(),
            requester_id: owner,
            content: PostContentPatch::default(),
            tag_names: Some(Vec::new()),
        })
        .await
        .expect("update succeeds");

    assert!(post.tags.is_empty());
}

#[tokio::test]
async fn reapplying_the_same_tags_writes_nothing() {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let current = post_with_tags(owner, &[&go]);
    let expected = current.clone();

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts.expect_update().times(0);

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner().times(0);
    tags.expect_create().times(0);

    let mut cleanup = MockTagCleanupQueue::new();
    cleanup.expect_enqueue().times(0);

    let service = make_service(posts, tags, cleanup);
    let post = service
        .update_post(UpdatePostRequest {
            post_id: expected.id,
            requester_id: owner,
            content: PostContentPatch::default(),
            tag_names: Some(vec![name("go")]),
        })
        .await
        .expect("update succeeds");

    assert_eq!(post, expected);
}

#[tokio::test]
async fn update_by_non_owner_is_forbidden_before_any_write() {
    let owner = UserId::random();
    let current = post_with_tags(owner, &[]);

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts.expect_update().times(0);

    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner().times(0);
    tags.expect_create().times(0);

    let service = make_service(posts, tags, MockTagCleanupQueue::new());
    let error = service
        .update_post(UpdatePostRequest {
            post_id: PostId::random(),
            requester_id: UserId::random(),
            content: PostContentPatch::default(),
            tag_names: Some(vec![name("stolen")]),
        })
        .await
        .expect_err("non-owner rejected");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(Ok(None), ErrorCode::NotFound)]
#[case(Err(PostRepositoryError::connection("down")), ErrorCode::ServiceUnavailable)]
#[case(Err(PostRepositoryError::query("bad column")), ErrorCode::InternalError)]
#[tokio::test]
async fn update_maps_lookup_failures(
    #[case] lookup: Result<Option<Post>, PostRepositoryError>,
    #[case] expected: ErrorCode,
) {
    let mut posts = MockPostRepository::new();
    posts.expect_find_by_id().return_once(move |_| lookup);

    let service = make_service(posts, MockTagRepository::new(), MockTagCleanupQueue::new());
    let error = service
        .update_post(UpdatePostRequest {
            post_id: PostId::random(),
            requester_id: UserId::random(),
            content: PostContentPatch::default(),
            tag_names: None,
        })
        .await
        .expect_err("lookup failure propagates");

    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn cleanup_enqueue_failure_does_not_fail_update() {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let current = post_with_tags(owner, &[&go]);
    let returned = with_summaries(current.clone(), Vec::new());

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts
        .expect_update()
        .return_once(move |_, _| Ok(returned));

    let mut cleanup = MockTagCleanupQueue::new();
    cleanup
        .expect_enqueue()
        .times(1)
        .return_once(|_| Err(TagCleanupQueueError::unavailable("worker stopped")));

    let service = make_service(posts, MockTagRepository::new(), cleanup);
    let post = service
        .update_post(UpdatePostRequest {
            post_id: PostId::random(),
            requester_id: owner,
            content: PostContentPatch::default(),
            tag_names: Some(Vec::new()),
        })
        .await
        .expect("update succeeds");

    assert!(post.tags.is_empty());
}

#[tokio::test]
async fn delete_without_permission_writes_nothing() {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let current = post_with_tags(owner, &[&go]);

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts.expect_delete().times(0);

    let mut tags = MockTagRepository::new();
    tags.expect_delete_if_unreferenced().times(0);

    let mut cleanup = MockTagCleanupQueue::new();
    cleanup.expect_enqueue().times(0);

    let service = make_service(posts, tags, cleanup);
    let error = service
        .delete_post(DeletePostRequest {
            post_id: PostId::random(),
            requester: Requester::new(UserId::random(), [Permission::User]),
        })
        .await
        .expect_err("stranger cannot delete");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(Permission::Admin)]
#[case(Permission::ItemDelete)]
#[tokio::test]
async fn privileged_delete_queues_former_tags(#[case] permission: Permission) {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let infra = owned_tag(owner, "infra");
    let current = post_with_tags(owner, &[&go, &infra]);
    let post_id = current.id;
    let former = vec![go.id, infra.id];

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts.expect_delete().times(1).return_once(|_| Ok(true));

    let mut cleanup = MockTagCleanupQueue::new();
    cleanup
        .expect_enqueue()
        .withf(move |request: &TagCleanupRequest| {
            request.post_id == post_id
                && request.tag_ids == former
                && request.reason == CleanupReason::PostDeleted
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(posts, MockTagRepository::new(), cleanup);
    let post = service
        .delete_post(DeletePostRequest {
            post_id,
            requester: Requester::new(UserId::random(), [permission]),
        })
        .await
        .expect("privileged delete succeeds");

    assert_eq!(post.id, post_id);
}

#[tokio::test]
async fn owner_delete_of_untagged_post_queues_nothing() {
    let owner = UserId::random();
    let current = post_with_tags(owner, &[]);
    let post_id = current.id;

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts.expect_delete().return_once(|_| Ok(true));

    let mut cleanup = MockTagCleanupQueue::new();
    cleanup.expect_enqueue().times(0);

    let service = make_service(posts, MockTagRepository::new(), cleanup);
    service
        .delete_post(DeletePostRequest {
            post_id,
            requester: Requester::anonymous_permissions(owner),
        })
        .await
        .expect("owner delete succeeds");
}

#[tokio::test]
async fn delete_racing_another_delete_reports_not_found() {
    let owner = UserId::random();
    let current = post_with_tags(owner, &[]);

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    posts.expect_delete().return_once(|_| Ok(false));

    let service = make_service(posts, MockTagRepository::new(), MockTagCleanupQueue::new());
    let error = service
        .delete_post(DeletePostRequest {
            post_id: PostId::random(),
            requester: Requester::anonymous_permissions(owner),
        })
        .await
        .expect_err("post vanished");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn posts_by_tags_flattens_and_dedupes() {
    let owner = UserId::random();
    let go = owned_tag(owner, "go");
    let infra = owned_tag(owner, "infra");
    let shared = post_with_tags(owner, &[&go, &infra]);
    let only_go = post_with_tags(UserId::random(), &[&go]);
    let (go_id, infra_id) = (go.id, infra.id);
    let go_posts = vec![shared.clone(), only_go.clone()];
    let infra_posts = vec![shared.clone()];

    let mut posts = MockPostRepository::new();
    posts.expect_find_by_tag().times(2).returning(move |tag_id| {
        if *tag_id == go_id {
            Ok(go_posts.clone())
        } else {
            Ok(infra_posts.clone())
        }
    });

    let service = make_service(posts, MockTagRepository::new(), MockTagCleanupQueue::new());
    let found = service
        .posts_by_tags(&[go_id, infra_id])
        .await
        .expect("query succeeds");

    assert_eq!(found, vec![shared, only_go]);
}

#[tokio::test]
async fn posts_by_no_tags_is_empty() {
    let mut posts = MockPostRepository::new();
    posts.expect_find_by_tag().times(0);

    let service = make_service(posts, MockTagRepository::new(), MockTagCleanupQueue::new());
    let found = service.posts_by_tags(&[]).await.expect("query succeeds");

    assert!(found.is_empty());
}

#[tokio::test]
async fn tags_for_owner_maps_store_errors() {
    let mut tags = MockTagRepository::new();
    tags.expect_find_by_owner()
        .return_once(|_| Err(TagRepositoryError::query("bad filter")));

    let service = make_service(MockPostRepository::new(), tags, MockTagCleanupQueue::new());
    let error = service
        .tags_for_owner(&UserId::random())
        .await
        .expect_err("store failure propagates");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
