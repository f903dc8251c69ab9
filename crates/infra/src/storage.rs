//! # 写真ストレージ（S3 接続管理）
//!
//! イベント写真・部員アバターの保存先として Amazon S3 / MinIO への
//! 接続管理と Presigned URL 生成を行う。
//!
//! ## 設計方針
//!
//! - **ローカル開発**: MinIO を使用（`S3_ENDPOINT_URL` で接続先を指定）
//! - **本番環境**: IAM ロールによる認証で Amazon S3 に接続（`S3_ENDPOINT_URL` 未設定）
//! - **Presigned URL**: ブラウザが S3 に直接 PUT/GET する方式（サーバーは URL 発行のみ）
//! - **メタデータ分離**: DB には [`tsudoi_domain::attachment::PhotoMetadata`]
//!   のみを保存し、ファイル本体は S3 に置く

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{Client, presigning::PresigningConfig};

use crate::InfraError;

/// 写真ストレージのインターフェース
///
/// Presigned URL の生成とオブジェクトの存在確認を提供する。
/// テスト時はモックに差し替え可能。
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Presigned PUT URL を生成する（アップロード用）
    ///
    /// ブラウザがこの URL に対して HTTP PUT でファイルを直接アップロードする。
    ///
    /// # 引数
    ///
    /// * `object_key` - S3 オブジェクトキー（例: `events/019.../photo.png`）
    /// * `content_type` - MIME タイプ（例: `image/png`）
    /// * `content_length` - ファイルサイズ（バイト）
    /// * `expires_in` - URL の有効期限
    async fn generate_presigned_put_url(
        &self,
        object_key: &str,
        content_type: &str,
        content_length: i64,
        expires_in: Duration,
    ) -> Result<String, InfraError>;

    /// Presigned GET URL を生成する（ダウンロード用）
    async fn generate_presigned_get_url(
        &self,
        object_key: &str,
        expires_in: Duration,
    ) -> Result<String, InfraError>;

    /// オブジェクトの存在を確認する（HEAD Object）
    ///
    /// アップロード完了通知時に、S3 にファイルが実際に存在するかを確認する。
    async fn head_object(&self, object_key: &str) -> Result<bool, InfraError>;
}

/// S3 写真ストレージ
///
/// `aws-sdk-s3` を使用した [`PhotoStorage`] の実装。
/// MinIO とも互換動作する。
pub struct S3PhotoStorage {
    client:      Client,
    bucket_name: String,
}

impl S3PhotoStorage {
    /// 新しいストレージインスタンスを作成する
    pub fn new(client: Client, bucket_name: String) -> Self {
        Self {
            client,
            bucket_name,
        }
    }
}

#[async_trait]
impl PhotoStorage for S3PhotoStorage {
    async fn generate_presigned_put_url(
        &self,
        object_key: &str,
        content_type: &str,
        content_length: i64,
        expires_in: Duration,
    ) -> Result<String, InfraError> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| InfraError::storage(format!("Presigned 設定の構築に失敗: {e}")))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(object_key)
            .content_type(content_type)
            .content_length(content_length)
            .presigned(presign_config)
            .await
            .map_err(|e| InfraError::storage(format!("Presigned PUT URL の生成に失敗: {e}")))?;

        Ok(presigned.uri().to_string())
    }

    async fn generate_presigned_get_url(
        &self,
        object_key: &str,
        expires_in: Duration,
    ) -> Result<String, InfraError> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| InfraError::storage(format!("Presigned 設定の構築に失敗: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(object_key)
            .presigned(presign_config)
            .await
            .map_err(|e| InfraError::storage(format!("Presigned GET URL の生成に失敗: {e}")))?;

        Ok(presigned.uri().to_string())
    }

    async fn head_object(&self, object_key: &str) -> Result<bool, InfraError> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket_name)
            .key(object_key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) => {
                // NotFound（404）の場合は false を返す
                let is_not_found = err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false);
                if is_not_found {
                    Ok(false)
                } else {
                    Err(InfraError::storage(format!(
                        "HEAD Object の実行に失敗: {err}"
                    )))
                }
            }
        }
    }
}

/// S3 クライアントを作成する
///
/// `endpoint` が `Some` の場合は MinIO 等のカスタムエンドポイントに接続する。
/// `None` の場合は AWS S3 のデフォルトエンドポイントを使用する。
///
/// 認証情報は SDK のデフォルト認証チェーンで解決する:
/// - ローカル: 環境変数 `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
/// - 本番: IAM ロール
pub async fn create_client(endpoint: Option<&str>) -> Client {
    let mut config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new("ap-northeast-1"));

    if let Some(endpoint_url) = endpoint {
        config_builder = config_builder.endpoint_url(endpoint_url);
    }

    let config = config_builder.load().await;

    // MinIO はパススタイルが必要（バーチャルホスト型 URL を使わない）
    let s3_config_builder = aws_sdk_s3::config::Builder::from(&config);
    let s3_config = if endpoint.is_some() {
        s3_config_builder.force_path_style(true).build()
    } else {
        s3_config_builder.build()
    };

    Client::from_conf(s3_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<S3PhotoStorage>();
    }
}
