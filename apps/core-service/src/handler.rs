//! # API ハンドラ層
//!
//! 内部 API のエンドポイントを実装する。
//!
//! ## 設計方針
//!
//! - **State パターン**: ハンドラグループごとに State 構造体を持ち、
//!   `State(Arc<…State>)` で注入する
//! - **DTO 分離**: エンティティをそのまま返さず、レスポンス DTO に変換する
//! - **操作主体**: 変更系エンドポイントは `?member_id=` クエリで操作主体を
//!   受け取る（認証は上流コラボレータの責務で、この内部 API は
//!   転送された部員 ID を信頼する）
//! - **現在時刻の取得はここまで**: ハンドラが Clock から `now` を取得し、
//!   ユースケースへ引数として渡す

pub mod article;
pub mod comment;
pub mod event;
pub mod following;
pub mod health;
pub mod member;
pub mod news;
pub mod notification;
pub mod practice;
pub mod route;

use serde::Deserialize;
use uuid::Uuid;

pub use article::{ArticleState, create_article, delete_article, edit_article, get_article, list_articles};
pub use comment::{CommentState, create_comment, delete_comment, list_comments};
pub use event::{
    EventState,
    confirm_event_photo,
    create_event,
    delete_event,
    get_event,
    get_event_photo_url,
    issue_event_photo_upload_url,
    list_events,
    update_event,
};
pub use following::{
    FollowState,
    follow_event,
    list_event_followers,
    list_followed_events,
    unfollow_event,
};
pub use health::health_check;
pub use member::{
    MemberState,
    approve_member,
    delete_member,
    get_member,
    list_members,
    register_member,
    set_member_officer,
    update_member_profile,
};
pub use news::{NewsState, create_news, delete_news, get_news, list_news, update_news};
pub use notification::{NotificationState, dispatch_upcoming_event_notifications};
pub use practice::{
    PracticeState,
    create_practice,
    delete_practice,
    get_practice,
    list_practices,
    update_practice,
};
pub use route::{RouteState, create_route, delete_route, get_route, list_routes, update_route};

/// 操作主体の部員を指定するクエリ
///
/// 例: `POST /internal/events?member_id={uuid}`
#[derive(Debug, Deserialize)]
pub struct ActorQuery {
    pub member_id: Uuid,
}
