//! Closed value sets of the training API.

use mlsdk_core::wire_enum;
use strum::{EnumIter, IntoStaticStr};

/// Primary status of a training job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum TrainingJobStatus {
    InProgress,
    Completed,
    Failed,
    Stopping,
    Stopped,
}
wire_enum!(TrainingJobStatus);

/// Detailed progress of a training job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum SecondaryStatus {
    Starting,
    LaunchingMLInstances,
    PreparingTrainingStack,
    Downloading,
    DownloadingTrainingImage,
    Training,
    Uploading,
    Stopping,
    Stopped,
    MaxRuntimeExceeded,
    Completed,
    Failed,
    Interrupted,
    MaxWaitTimeExceeded,
}
wire_enum!(SecondaryStatus);

/// How training data reaches the algorithm container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum TrainingInputMode {
    Pipe,
    File,
}
wire_enum!(TrainingInputMode);

/// ML compute instance types available for training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum TrainingInstanceType {
    #[strum(serialize = "ml.m5.large")]
    MlM5Large,
    #[strum(serialize = "ml.m5.xlarge")]
    MlM5Xlarge,
    #[strum(serialize = "ml.c5.xlarge")]
    MlC5Xlarge,
    #[strum(serialize = "ml.c5.2xlarge")]
    MlC52xlarge,
    #[strum(serialize = "ml.p3.2xlarge")]
    MlP32xlarge,
    #[strum(serialize = "ml.p3.8xlarge")]
    MlP38xlarge,
}
wire_enum!(TrainingInstanceType);

/// Field a listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum SortBy {
    Name,
    CreationTime,
    Status,
}
wire_enum!(SortBy);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum SortOrder {
    Ascending,
    Descending,
}
wire_enum!(SortOrder);
