use std::fmt;

/// カメラサブシステムが所有する不透明な画像バッファ。
/// 解放はDropで一度だけ行われる（プラットフォーム側のImageProxy.close等に相当）。
pub trait FrameBuffer: Send {
    fn bytes(&self) -> &[u8];
}

/// 推論パイプラインを流れる1フレーム。
/// 所有権は常にパイプラインのどこか1箇所にあり、成功・失敗・ドロップの
/// どの経路でもmoveによって消費され、バッファはDropでちょうど一度解放される。
pub struct PoseFrame {
    buffer: Box<dyn FrameBuffer>,
    width: u32,
    height: u32,
    /// センサー回転（0/90/180/270度）。モデル呼び出し時にそのまま渡す。
    rotation_degrees: u32,
    /// 単調増加のキャプチャ時刻（マイクロ秒）
    timestamp_us: u64,
}

impl PoseFrame {
    pub fn new(
        buffer: Box<dyn FrameBuffer>,
        width: u32,
        height: u32,
        rotation_degrees: u32,
        timestamp_us: u64,
    ) -> Self {
        Self {
            buffer,
            width,
            height,
            rotation_degrees,
            timestamp_us,
        }
    }

    pub fn buffer(&self) -> &dyn FrameBuffer {
        self.buffer.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rotation_degrees(&self) -> u32 {
        self.rotation_degrees
    }

    pub fn timestamp_us(&self) -> u64 {
        self.timestamp_us
    }
}

impl fmt::Debug for PoseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rotation_degrees", &self.rotation_degrees)
            .field("timestamp_us", &self.timestamp_us)
            .finish_non_exhaustive()
    }
}

/// メモリ上のピクセルデータを持つ単純なバッファ実装（デモ・テスト用）
pub struct VecFrameBuffer {
    data: Vec<u8>,
}

impl VecFrameBuffer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl FrameBuffer for VecFrameBuffer {
    fn bytes(&self) -> &[u8] {
        &self.data
    }
}

/// 解放回数を数えるテスト用バッファ（feeder/pumpのリーク検証で共用）
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub(crate) struct CountingBuffer {
        released: Arc<AtomicUsize>,
    }

    impl CountingBuffer {
        pub(crate) fn new(released: Arc<AtomicUsize>) -> Self {
            Self { released }
        }
    }

    impl FrameBuffer for CountingBuffer {
        fn bytes(&self) -> &[u8] {
            &[]
        }
    }

    impl Drop for CountingBuffer {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// 解放カウンタ付きフレームを作る
    pub(crate) fn counted_frame(timestamp_us: u64, released: Arc<AtomicUsize>) -> PoseFrame {
        PoseFrame::new(
            Box::new(CountingBuffer::new(released)),
            1280,
            720,
            0,
            timestamp_us,
        )
    }
}
