// src/feed.rs
use std::sync::mpsc::Sender;
use std::thread;

use futures_util::StreamExt;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;

use crate::error::FeedError;
use crate::types::{FeedEvent, PulseSample};

/// Deserialize one textual feed message.
pub fn parse_sample(text: &str) -> Result<PulseSample, FeedError> {
    Ok(serde_json::from_str(text)?)
}

/// Owned by the GUI for the lifetime of the subscription. Dropping the
/// handle closes the connection, so every exit path releases it.
pub struct FeedHandle {
    shutdown: Option<oneshot::Sender<()>>,
}

impl FeedHandle {
    /// Ask the subscriber thread to close the connection. Safe to call any
    /// number of times; the connection is only closed once.
    pub fn close(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            // 订阅线程可能已经自己退出了，此时信号丢弃即可
            let _ = tx.send(());
            log::info!("feed shutdown requested");
        }
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.shutdown.is_some()
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Spawn the subscriber thread: exactly one connection, no reconnects.
///
/// The thread runs a single-threaded tokio runtime for the websocket read
/// loop and forwards everything to the GUI over `tx`. Message order on the
/// channel is the arrival order on the connection.
pub fn spawn(endpoint: String, tx: Sender<FeedEvent>) -> FeedHandle {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                log::error!("failed to start feed runtime: {err}");
                tx.send(FeedEvent::Log(format!("❌ 订阅线程启动失败: {err}")))
                    .ok();
                tx.send(FeedEvent::Status(false)).ok();
                return;
            }
        };
        rt.block_on(run(endpoint, tx, shutdown_rx));
    });
    FeedHandle {
        shutdown: Some(shutdown_tx),
    }
}

async fn run(endpoint: String, tx: Sender<FeedEvent>, mut shutdown: oneshot::Receiver<()>) {
    let connected = tokio_tungstenite::connect_async(&endpoint).await;
    let mut ws = match connected {
        Ok((ws, _)) => ws,
        Err(source) => {
            let err = FeedError::Connect { endpoint, source };
            log::warn!("{err}");
            tx.send(FeedEvent::Log(format!("❌ {err}"))).ok();
            tx.send(FeedEvent::Status(false)).ok();
            return;
        }
    };
    log::info!("connected to {endpoint}");
    tx.send(FeedEvent::Status(true)).ok();
    tx.send(FeedEvent::Log(format!("✅ 已连接 {endpoint}"))).ok();

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            msg = ws.next() => match msg {
                Some(Ok(Message::Text(text))) => match parse_sample(&text) {
                    Ok(sample) => {
                        // GUI 已退出时直接收尾
                        if tx.send(FeedEvent::Sample(sample)).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        // 坏消息只汇报，不中断订阅，缓冲区保持原样
                        log::warn!("{err}");
                        tx.send(FeedEvent::Log(format!("⚠ {err}"))).ok();
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    log::info!("feed closed by server");
                    tx.send(FeedEvent::Log("🛑 数据源已断开".to_owned())).ok();
                    break;
                }
                Some(Ok(_)) => {} // ping/pong/binary 与绘图无关，忽略
                Some(Err(source)) => {
                    let err = FeedError::Stream(source);
                    log::warn!("{err}");
                    tx.send(FeedEvent::Log(format!("❌ {err}"))).ok();
                    break;
                }
            }
        }
    }

    // 尽力发 close frame；之后传输层不会再回调任何消息
    let _ = ws.close(None).await;
    tx.send(FeedEvent::Status(false)).ok();
}

/// Handle with a live shutdown slot but no thread behind it.
#[cfg(test)]
pub fn detached_handle() -> FeedHandle {
    let (shutdown, _rx) = oneshot::channel();
    FeedHandle {
        shutdown: Some(shutdown),
    }
}
