/// Implement `LodgingService` by delegating to inherent `_find`, `_get`,
/// `_create`, `_patch` and `_remove` methods. The type must carry a
/// `capabilities: ServiceCapabilities` field.
#[macro_export]
macro_rules! lodging_adapter {
    ($ty:ty, $rec:ty, $params:ty) => {
        #[async_trait::async_trait]
        impl $crate::LodgingService<$rec, $params> for $ty {
            fn capabilities(&self) -> $crate::ServiceCapabilities {
                self.capabilities.clone()
            }

            async fn find(
                &self,
                ctx: &$crate::context::CallContext,
                params: $params,
            ) -> anyhow::Result<Vec<$rec>> {
                self._find(ctx, params).await
            }

            async fn get(
                &self,
                ctx: &$crate::context::CallContext,
                id: &str,
                params: $params,
            ) -> anyhow::Result<$rec> {
                self._get(ctx, id, params).await
            }

            async fn create(
                &self,
                ctx: &$crate::context::CallContext,
                data: $rec,
                params: $params,
            ) -> anyhow::Result<$rec> {
                self._create(ctx, data, params).await
            }

            async fn patch(
                &self,
                ctx: &$crate::context::CallContext,
                id: Option<&str>,
                data: $rec,
                params: $params,
            ) -> anyhow::Result<$rec> {
                self._patch(ctx, id, data, params).await
            }

            async fn remove(
                &self,
                ctx: &$crate::context::CallContext,
                id: Option<&str>,
                params: $params,
            ) -> anyhow::Result<$rec> {
                self._remove(ctx, id, params).await
            }
        }
    };
}
