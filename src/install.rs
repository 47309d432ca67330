//! ホーム画面への追加（インストール）案内
//!
//! 画面状態マシンとは独立。ホスト側が「インストール可能」シグナルを受けたら
//! `set_prompt_available` でプロンプトを登録し、ユーザー操作で `request_install` を呼ぶ。
//! シグナルを出さない端末（iOS）やプロンプト消費後は手動手順を表示する。

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref IOS_USER_AGENT: Regex = Regex::new(r"iPad|iPhone|iPod").unwrap();
}

/// 端末種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceKind {
    /// インストールシグナルを出さない
    Ios,
    #[default]
    Other,
}

impl DeviceKind {
    pub fn from_user_agent(user_agent: &str) -> Self {
        if IOS_USER_AGENT.is_match(user_agent) {
            DeviceKind::Ios
        } else {
            DeviceKind::Other
        }
    }

    /// 手動インストール手順
    pub fn manual_instructions(&self) -> &'static [&'static str] {
        match self {
            DeviceKind::Ios => &[
                "在 iOS (iPhone) 上安装：",
                "1. 点击浏览器底部的“分享”按钮",
                "2. 向下滑动，选择“添加到主屏幕”",
            ],
            DeviceKind::Other => &[
                "在 Android 上安装：",
                "1. 点击浏览器右上角的菜单图标 (⋮)",
                "2. 选择“安装应用”或“添加到主屏幕”",
                "注：如果您使用的是微信，请点击右上角三个点，选择“在浏览器打开”后再试。",
            ],
        }
    }
}

/// プラットフォームのインストールプロンプトの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

/// ホストが提供するインストールプロンプト
#[async_trait]
pub trait InstallPrompt: Send {
    async fn prompt(&mut self) -> InstallOutcome;
}

/// `request_install` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallAction {
    Prompted(InstallOutcome),
    ShowInstructions(&'static [&'static str]),
}

#[derive(Default)]
pub struct InstallAdvisory {
    deferred: Option<Box<dyn InstallPrompt>>,
    show_manual_instructions: bool,
    device_kind: DeviceKind,
}

impl InstallAdvisory {
    pub fn new(device_kind: DeviceKind) -> Self {
        Self {
            device_kind,
            ..Self::default()
        }
    }

    pub fn prompt_available(&self) -> bool {
        self.deferred.is_some()
    }

    pub fn show_manual_instructions(&self) -> bool {
        self.show_manual_instructions
    }

    pub fn device_kind(&self) -> DeviceKind {
        self.device_kind
    }

    /// プロンプトを登録（`None` で取り消し）
    pub fn set_prompt_available(&mut self, prompt: Option<Box<dyn InstallPrompt>>) {
        debug!(available = prompt.is_some(), "インストールプロンプト更新");
        self.deferred = prompt;
    }

    pub fn set_device_kind(&mut self, kind: DeviceKind) {
        self.device_kind = kind;
    }

    /// インストールボタン押下
    ///
    /// プロンプトがあれば表示し、承諾されたら消費する（拒否なら保持）。
    /// なければ手動手順を表示状態にする。
    pub async fn request_install(&mut self) -> InstallAction {
        if let Some(prompt) = self.deferred.as_mut() {
            let outcome = prompt.prompt().await;
            debug!(?outcome, "インストールプロンプト結果");
            if outcome == InstallOutcome::Accepted {
                self.deferred = None;
            }
            return InstallAction::Prompted(outcome);
        }

        self.show_manual_instructions = true;
        InstallAction::ShowInstructions(self.device_kind.manual_instructions())
    }

    /// 手順表示を閉じる（「知道了」）
    pub fn dismiss_instructions(&mut self) {
        self.show_manual_instructions = false;
    }
}
