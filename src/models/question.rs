use serde::{Deserialize, Serialize};

/// 题目类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// 选择题（1 分）
    Mcq,
    /// 一句话问答（1 分）
    OneLiner,
    /// 简答题（2 分）
    Short,
    /// 论述题（5 分）
    Long,
}

impl Category {
    /// 类别对应的固定分区
    pub fn section(self) -> SectionId {
        match self {
            Category::Mcq => SectionId::A,
            Category::OneLiner => SectionId::B,
            Category::Short => SectionId::C,
            Category::Long => SectionId::D,
        }
    }
}

/// 分类后的题目
///
/// `options` 只有选择题才会非空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedQuestion {
    pub category: Category,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ClassifiedQuestion {
    pub fn new(category: Category, prompt: impl Into<String>) -> Self {
        Self {
            category,
            prompt: prompt.into(),
            options: Vec::new(),
        }
    }

    pub fn mcq(prompt: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            category: Category::Mcq,
            prompt: prompt.into(),
            options,
        }
    }
}

/// 试卷分区（固定为 A→B→C→D）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionId {
    A,
    B,
    C,
    D,
}

impl SectionId {
    /// 渲染顺序
    pub const ALL: [SectionId; 4] = [SectionId::A, SectionId::B, SectionId::C, SectionId::D];

    pub fn category(self) -> Category {
        match self {
            SectionId::A => Category::Mcq,
            SectionId::B => Category::OneLiner,
            SectionId::C => Category::Short,
            SectionId::D => Category::Long,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionId::A => "Section - A",
            SectionId::B => "Section - B",
            SectionId::C => "Section - C",
            SectionId::D => "Section - D",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            SectionId::A => "Multiple Choice Questions (10 Marks)",
            SectionId::B => "One-liner Questions (10 Marks) (1 mark each)",
            SectionId::C => "Short Questions (10 Marks)",
            SectionId::D => "Descriptive Questions (20 Marks)",
        }
    }

    pub fn instruction(self) -> Option<&'static str> {
        match self {
            SectionId::A => Some("Attempt all questions. Choose the correct option."),
            SectionId::B => None,
            SectionId::C => Some("Answer the following (2 marks each):"),
            SectionId::D => {
                Some("Answer any 4 out of the following 5 questions (5 marks each):")
            }
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// 四个分区的题目列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    buckets: [Vec<ClassifiedQuestion>; 4],
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SectionId) -> &[ClassifiedQuestion] {
        &self.buckets[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: SectionId) -> &mut Vec<ClassifiedQuestion> {
        &mut self.buckets[id.index()]
    }

    /// 按题目类别放入对应分区
    pub fn push(&mut self, question: ClassifiedQuestion) {
        let id = question.category.section();
        self.get_mut(id).push(question);
    }

    /// 按固定顺序遍历 (分区, 题目列表)
    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &[ClassifiedQuestion])> {
        SectionId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }

    /// 题目总数
    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_routes_by_category() {
        let mut sections = Sections::new();
        sections.push(ClassifiedQuestion::new(Category::Short, "Define ML."));
        sections.push(ClassifiedQuestion::mcq("1. What is AI?", vec!["a) x".into()]));

        assert_eq!(sections.get(SectionId::A).len(), 1);
        assert_eq!(sections.get(SectionId::C).len(), 1);
        assert!(sections.get(SectionId::B).is_empty());
        assert_eq!(sections.total(), 2);
    }

    #[test]
    fn test_iter_is_fixed_order() {
        let order: Vec<SectionId> = Sections::new().iter().map(|(id, _)| id).collect();
        assert_eq!(order, SectionId::ALL.to_vec());
    }

    #[test]
    fn test_section_b_has_no_instruction() {
        assert!(SectionId::B.instruction().is_none());
        assert_eq!(SectionId::D.category(), Category::Long);
    }
}
