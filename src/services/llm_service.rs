//! LLM 服务 - 业务能力层
//!
//! 只负责"根据资料出题"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（默认是 Gemini 的 OpenAI 兼容端点）

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::models::params::GenerationParams;
use crate::utils::logging::truncate_text;

/// 构建出题提示词
///
/// # 参数
/// - `material`: 学习资料全文
/// - `params`: 总分与各题型数量
pub fn build_prompt(material: &str, params: &GenerationParams) -> String {
    format!(
        "Generate a question paper from the following material.\n\
         Material:\n{material}\n\n\
         Parameters:\n\
         Total Marks: {total}\n\
         MCQs (1 mark): {mcq}\n\
         One-liner (1 mark): {one}\n\
         Short (2 marks): {short}\n\
         Long (5 marks): {long}\n\
         Format: List questions with marks.\n",
        material = material,
        total = params.total_marks,
        mcq = params.mcq_count,
        one = params.one_liner_count,
        short = params.short_count,
        long = params.long_count,
    )
}

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 生成试卷文本
/// - 提供通用的 LLM 调用接口
/// - 不做清洗和切分
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（去掉首尾空白）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(build_failed)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(build_failed)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(4096u32)
            .build()
            .map_err(build_failed)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    /// 根据资料生成试卷文本
    ///
    /// 返回模型的原始输出，清洗和切分由流程层负责。
    pub async fn generate_questions(
        &self,
        material: &str,
        params: &GenerationParams,
    ) -> AppResult<String> {
        info!(
            "🤖 请求出题: 选择 {} / 一句话 {} / 简答 {} / 论述 {}，总分 {}",
            params.mcq_count,
            params.one_liner_count,
            params.short_count,
            params.long_count,
            params.total_marks
        );
        let prompt = build_prompt(material, params);
        let text = self.send_to_llm(&prompt, None).await?;
        debug!("模型输出预览: {}", truncate_text(&text, 120));
        Ok(text)
    }
}

fn build_failed(e: OpenAIError) -> AppError {
    LlmError::RequestBuildFailed {
        source: Box::new(e),
    }
    .into()
}
