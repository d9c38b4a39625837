use std::sync::{Condvar, Mutex};

use super::frame::PoseFrame;

/// 1スロットの「最新のみ保持」メールボックス。
///
/// カメラ側スレッドがネイティブレート（~30fps）でpushし、推論ワーカーが
/// takeで取り出す。ワーカーが処理中に届いたフレームは保持中の未処理
/// フレームを置き換え、古い方はその場でドロップ（=バッファ解放）する。
/// FIFOキューにしないことで、推論が遅くても遅延は最大1フレーム間隔に
/// 抑えられる（CameraXのSTRATEGY_KEEP_ONLY_LATEST相当）。
pub struct FrameSlot {
    inner: Mutex<SlotInner>,
    cond: Condvar,
}

struct SlotInner {
    frame: Option<PoseFrame>,
    closed: bool,
    /// 置き換えでドロップしたフレーム数（診断用）
    dropped: u64,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                frame: None,
                closed: false,
                dropped: 0,
            }),
            cond: Condvar::new(),
        }
    }

    /// 新フレームを置く。未消費のフレームがあれば置き換えてドロップする。
    /// 置き換えが起きたらtrueを返す。クローズ後のpushは新フレームを即ドロップ。
    pub fn push(&self, frame: PoseFrame) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.closed {
            // stopとの競合で遅れて届いたフレーム。処理せず解放。
            drop(inner);
            drop(frame);
            return false;
        }
        let replaced = inner.frame.replace(frame);
        let was_pending = replaced.is_some();
        if was_pending {
            inner.dropped += 1;
        }
        drop(inner);
        drop(replaced); // 旧フレームの解放はロック外で
        self.cond.notify_one();
        was_pending
    }

    /// フレームが届くまでブロックして取り出す。クローズされたらNone。
    pub fn take(&self) -> Option<PoseFrame> {
        let mut inner = self.inner.lock().unwrap();
        loop {
            if let Some(frame) = inner.frame.take() {
                return Some(frame);
            }
            if inner.closed {
                return None;
            }
            inner = self.cond.wait(inner).unwrap();
        }
    }

    /// スロットを閉じる。保持中の未処理フレームは処理せず破棄する。冪等。
    pub fn close(&self) {
        let pending = {
            let mut inner = self.inner.lock().unwrap();
            inner.closed = true;
            inner.frame.take()
        };
        drop(pending);
        self.cond.notify_all();
    }

    pub fn dropped_count(&self) -> u64 {
        self.inner.lock().unwrap().dropped
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::frame::testing::counted_frame;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_push_then_take() {
        let slot = FrameSlot::new();
        let released = Arc::new(AtomicUsize::new(0));
        assert!(!slot.push(counted_frame(1, released.clone())));
        let frame = slot.take().unwrap();
        assert_eq!(frame.timestamp_us(), 1);
        assert_eq!(released.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_keep_latest_drops_earlier_exactly_once() {
        // ワーカーがビジーの間に3フレーム到着 → 最後の1枚だけ残り、
        // 先行2枚はちょうど一度ずつ解放される
        let slot = FrameSlot::new();
        let r1 = Arc::new(AtomicUsize::new(0));
        let r2 = Arc::new(AtomicUsize::new(0));
        let r3 = Arc::new(AtomicUsize::new(0));

        assert!(!slot.push(counted_frame(1, r1.clone())));
        assert!(slot.push(counted_frame(2, r2.clone())));
        assert!(slot.push(counted_frame(3, r3.clone())));

        assert_eq!(r1.load(Ordering::SeqCst), 1);
        assert_eq!(r2.load(Ordering::SeqCst), 1);
        assert_eq!(r3.load(Ordering::SeqCst), 0);
        assert_eq!(slot.dropped_count(), 2);

        let frame = slot.take().unwrap();
        assert_eq!(frame.timestamp_us(), 3);
    }

    #[test]
    fn test_take_blocks_until_push() {
        let slot = Arc::new(FrameSlot::new());
        let slot_ref = Arc::clone(&slot);
        let handle = thread::spawn(move || slot_ref.take());

        thread::sleep(Duration::from_millis(50));
        let released = Arc::new(AtomicUsize::new(0));
        slot.push(counted_frame(7, released));

        let frame = handle.join().unwrap().unwrap();
        assert_eq!(frame.timestamp_us(), 7);
    }

    #[test]
    fn test_close_discards_pending_and_unblocks() {
        let slot = FrameSlot::new();
        let released = Arc::new(AtomicUsize::new(0));
        slot.push(counted_frame(1, released.clone()));

        slot.close();
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_close_unblocks_waiting_taker() {
        let slot = Arc::new(FrameSlot::new());
        let slot_ref = Arc::clone(&slot);
        let handle = thread::spawn(move || slot_ref.take());

        thread::sleep(Duration::from_millis(50));
        slot.close();
        assert!(handle.join().unwrap().is_none());
    }

    #[test]
    fn test_push_after_close_releases_frame() {
        let slot = FrameSlot::new();
        slot.close();
        let released = Arc::new(AtomicUsize::new(0));
        assert!(!slot.push(counted_frame(1, released.clone())));
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_close_is_idempotent() {
        let slot = FrameSlot::new();
        slot.close();
        slot.close();
        assert!(slot.take().is_none());
    }
}
