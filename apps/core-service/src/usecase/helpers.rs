//! # ユースケース共通ヘルパー
//!
//! 複数のユースケースで共有する認可チェックを提供する。

use std::sync::Arc;

use tsudoi_domain::member::{Member, MemberId};
use tsudoi_infra::repository::MemberRepository;

use crate::error::CoreError;

/// 操作主体の部員を取得し、役員権限を要求する
///
/// 管理系の変更操作（イベント・お知らせ等の作成/更新/削除）の入口で呼ぶ。
///
/// # エラー
///
/// - 部員が存在しない場合は `NotFound`
/// - 役員でない場合は `Forbidden`
pub(crate) async fn require_officer(
   member_repo: &Arc<dyn MemberRepository>,
   member_id: &MemberId,
) -> Result<Member, CoreError> {
   let Some(member) = member_repo.find_by_id(member_id).await? else {
      return Err(CoreError::NotFound(format!("Member: {member_id}")));
   };

   if !member.is_officer() {
      return Err(CoreError::Forbidden(
         "この操作には役員権限が必要です".to_string(),
      ));
   }

   Ok(member)
}

/// 操作主体の部員を取得する（権限は要求しない）
pub(crate) async fn require_member(
   member_repo: &Arc<dyn MemberRepository>,
   member_id: &MemberId,
) -> Result<Member, CoreError> {
   let Some(member) = member_repo.find_by_id(member_id).await? else {
      return Err(CoreError::NotFound(format!("Member: {member_id}")));
   };

   Ok(member)
}
