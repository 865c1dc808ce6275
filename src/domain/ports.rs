use crate::domain::model::Dataset;
use crate::utils::error::Result;

/// 將資料列分派到目標資料表的分解策略。
///
/// 步進器只透過此介面分解資料，日後換成真正的投影／合併實作時不必改動狀態機。
pub trait Decomposer: Send + Sync {
    fn project(&self, dataset: &Dataset, tables: &[String]) -> Dataset;
}

/// 上傳資料的來源（檔案讀取與解析屬於呼叫端的非同步邊界）
pub trait DatasetSource: Send + Sync {
    fn read_dataset(&self) -> impl std::future::Future<Output = Result<Dataset>> + Send;
}
