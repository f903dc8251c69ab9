//! # ルートユースケース
//!
//! ランニングルートの管理を実装する。変更操作は役員のみ。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tsudoi_domain::{
   member::MemberId,
   route::{Route, RouteId},
   value_objects::Title,
};
use tsudoi_infra::repository::{MemberRepository, RouteRepository};

use crate::{error::CoreError, usecase::helpers};

/// ルートユースケース実装
pub struct RouteUseCaseImpl {
   route_repo: Arc<dyn RouteRepository>,
   member_repo: Arc<dyn MemberRepository>,
}

impl RouteUseCaseImpl {
   pub fn new(
      route_repo: Arc<dyn RouteRepository>,
      member_repo: Arc<dyn MemberRepository>,
   ) -> Self {
      Self {
         route_repo,
         member_repo,
      }
   }

   /// ルートを作成する（役員のみ）
   pub async fn create(
      &self,
      acting_member_id: &MemberId,
      title: Title,
      distance: Option<i64>,
      map_my_run_id: Option<String>,
      now: DateTime<Utc>,
   ) -> Result<Route, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let route = Route::new(RouteId::new(), title, distance, map_my_run_id, now);
      self.route_repo.insert(&route).await?;
      Ok(route)
   }

   /// ルートを取得する
   pub async fn get(&self, id: &RouteId) -> Result<Route, CoreError> {
      let Some(route) = self.route_repo.find_by_id(id).await? else {
         return Err(CoreError::NotFound(format!("Route: {id}")));
      };
      Ok(route)
   }

   /// 全ルートを取得する
   pub async fn list(&self) -> Result<Vec<Route>, CoreError> {
      Ok(self.route_repo.find_all().await?)
   }

   /// ルートを更新する（役員のみ）
   pub async fn update(
      &self,
      acting_member_id: &MemberId,
      id: &RouteId,
      title: Title,
      distance: Option<i64>,
      map_my_run_id: Option<String>,
      now: DateTime<Utc>,
   ) -> Result<Route, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let route = self.get(id).await?;
      let updated = route.with_details(title, distance, map_my_run_id, now);
      self.route_repo.update(&updated).await?;
      Ok(updated)
   }

   /// ルートを削除する（役員のみ）
   pub async fn delete(
      &self,
      acting_member_id: &MemberId,
      id: &RouteId,
   ) -> Result<(), CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      self.get(id).await?;
      self.route_repo.delete(id).await?;
      Ok(())
   }
}
